//! Persistence service contract and backend selection.
//!
//! The store consumes the [`NotesService`] trait and treats the backend as
//! opaque. Two implementations exist: [`LocalNotesService`] (JSON collection
//! file) and [`MemoryNotesService`] (tests and benchmarks). A remote
//! implementation is a future capability selected by a base-URL-like
//! configuration value; until it exists the selector falls back to local.

mod local;
mod memory;

pub use local::LocalNotesService;
pub use memory::MemoryNotesService;

use crate::domain::{Note, NoteFields, NoteId};
use crate::infra::StorageError;
use log::warn;
use std::path::PathBuf;
use thiserror::Error;

/// Title given to notes created without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Errors that can occur during persistence operations.
///
/// A missing record is not an error — operations targeting an id that no
/// longer exists surface `Ok(None)` (or `Ok(true)` for the idempotent
/// remove), so only the storage medium itself can fail.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The storage medium rejected a write.
    #[error("storage backend failed: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for persistence operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Initial fields for a note being created.
///
/// Unset fields fall back to [`DEFAULT_TITLE`] and an empty body.
#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    title: Option<String>,
    content: Option<String>,
}

impl NoteDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the initial content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Returns the title to create the note with.
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Returns the content to create the note with.
    pub fn content_or_default(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// Storage backend contract for notes.
///
/// By convention `list` returns notes sorted by `updated_at` descending; the
/// store treats the order as opaque. The contract never panics for a
/// degraded medium: reads yield empty collections, a missing id yields
/// `None`, and `remove` of a missing id is acknowledged as success.
pub trait NotesService {
    /// Lists all notes, newest first.
    fn list(&self) -> ServiceResult<Vec<Note>>;

    /// Creates a new note with a generated id and the current timestamp.
    fn create(&mut self, draft: NoteDraft) -> ServiceResult<Note>;

    /// Retrieves a single note by id.
    fn get(&self, id: &NoteId) -> ServiceResult<Option<Note>>;

    /// Merges `fields` into the note and refreshes its timestamp.
    ///
    /// Returns `None` when the id no longer exists (persistence miss).
    fn update(&mut self, id: &NoteId, fields: NoteFields) -> ServiceResult<Option<Note>>;

    /// Removes a note by id (idempotent; a missing id is still success).
    fn remove(&mut self, id: &NoteId) -> ServiceResult<bool>;

    /// Populates sample content only when the collection is empty.
    fn seed_if_empty(&mut self) -> ServiceResult<()>;
}

/// Selects the active backend.
///
/// When `api_base` is set to a non-blank value a remote backend would be
/// selected; none is implemented, so the selector logs a warning and uses
/// local storage at `data_file` either way.
pub fn active_service(api_base: Option<&str>, data_file: PathBuf) -> Box<dyn NotesService> {
    if let Some(base) = api_base.filter(|b| !b.trim().is_empty()) {
        warn!("remote backend '{base}' is not implemented; using local storage");
    }
    Box::new(LocalNotesService::new(data_file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults_to_untitled_and_empty() {
        let draft = NoteDraft::new();
        assert_eq!(draft.title_or_default(), "Untitled");
        assert_eq!(draft.content_or_default(), "");
    }

    #[test]
    fn draft_keeps_explicit_fields() {
        let draft = NoteDraft::new().title("Plans").content("- step one");
        assert_eq!(draft.title_or_default(), "Plans");
        assert_eq!(draft.content_or_default(), "- step one");
    }

    #[test]
    fn active_service_falls_back_to_local_for_api_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");

        // Remote is an unimplemented capability; both selections must honor
        // the same contract against the same local file.
        let mut with_base = active_service(Some("https://api.example.com"), path.clone());
        with_base.create(NoteDraft::new().title("From remote selector")).unwrap();

        let without_base = active_service(None, path);
        let notes = without_base.list().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title(), "From remote selector");
    }

    #[test]
    fn active_service_treats_blank_api_base_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let service = active_service(Some("   "), dir.path().join("notes.json"));
        assert!(service.list().unwrap().is_empty());
    }
}
