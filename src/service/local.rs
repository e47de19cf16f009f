//! JSON-file-backed notes service.

use crate::domain::{Note, NoteFields, NoteId};
use crate::infra::{read_collection, write_collection};
use crate::service::{NoteDraft, NotesService, ServiceResult};
use chrono::{Duration, Utc};
use log::debug;
use std::path::PathBuf;

/// Name of the collection file under the application data directory.
///
/// The `v1` suffix versions the durable record format.
pub const COLLECTION_FILE: &str = "notes-v1.json";

/// Notes service persisting to a single JSON collection file.
///
/// The whole collection is rewritten on every mutation; at the scale of a
/// personal notes file this is simpler and safer than partial updates. A
/// missing or malformed file reads as an empty collection, so a degraded
/// medium never takes the application down.
pub struct LocalNotesService {
    path: PathBuf,
}

impl LocalNotesService {
    /// Creates a service persisting to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default collection path: `<data_dir>/reef/notes-v1.json`.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reef")
            .join(COLLECTION_FILE)
    }

    fn load(&self) -> Vec<Note> {
        read_collection(&self.path)
    }

    fn persist(&self, notes: &[Note]) -> ServiceResult<()> {
        write_collection(&self.path, notes)?;
        Ok(())
    }
}

impl NotesService for LocalNotesService {
    fn list(&self) -> ServiceResult<Vec<Note>> {
        let mut notes = self.load();
        // Stable sort: notes sharing a timestamp keep their stored order.
        notes.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(notes)
    }

    fn create(&mut self, draft: NoteDraft) -> ServiceResult<Note> {
        let note = Note::new(
            NoteId::new(),
            draft.title_or_default(),
            draft.content_or_default(),
            Utc::now(),
        );

        let mut notes = self.load();
        notes.push(note.clone());
        self.persist(&notes)?;

        debug!("created note {}", note.id());
        Ok(note)
    }

    fn get(&self, id: &NoteId) -> ServiceResult<Option<Note>> {
        Ok(self.load().into_iter().find(|n| n.id() == id))
    }

    fn update(&mut self, id: &NoteId, fields: NoteFields) -> ServiceResult<Option<Note>> {
        let mut notes = self.load();
        let Some(index) = notes.iter().position(|n| n.id() == id) else {
            debug!("update miss for note {id}");
            return Ok(None);
        };

        let merged = notes[index].with_fields(&fields).touched(Utc::now());
        notes[index] = merged.clone();
        self.persist(&notes)?;

        Ok(Some(merged))
    }

    fn remove(&mut self, id: &NoteId) -> ServiceResult<bool> {
        let mut notes = self.load();
        notes.retain(|n| n.id() != id);
        self.persist(&notes)?;
        Ok(true)
    }

    fn seed_if_empty(&mut self) -> ServiceResult<()> {
        if !self.load().is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let samples = vec![
            Note::new(
                NoteId::new(),
                "Welcome to Reef",
                "# Reef\n\n\
                 Your markdown notes, kept close to shore.\n\n\
                 - Create, edit, delete\n\
                 - Markdown preview\n\
                 - Local persistence\n\n\
                 Tips:\n\
                 - Save with `reef edit`\n\
                 - Preview with `reef show --preview`\n\
                 - Search with `reef search`",
                now,
            ),
            Note::new(
                NoteId::new(),
                "Daily Journal",
                "Write your thoughts here...",
                now - Duration::hours(1),
            ),
        ];

        debug!("seeding {} sample notes", samples.len());
        self.persist(&samples)
    }
}
