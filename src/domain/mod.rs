//! Core types: Note, NoteFields, NoteId (ULID)

mod note;
mod note_id;

pub use note::{Note, NoteFields};
pub use note_id::{NoteId, ParseNoteIdError};
