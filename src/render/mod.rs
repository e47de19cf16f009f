//! Markdown-subset rendering for note previews.

mod markdown;

pub use markdown::render;
