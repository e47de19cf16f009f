//! Ambient infrastructure: collection file I/O and logging bootstrap.

pub mod logging;
mod storage;

pub use storage::{StorageError, read_collection, write_collection};
