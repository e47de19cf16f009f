//! In-memory notes service for tests and benchmarks.

use crate::domain::{Note, NoteFields, NoteId};
use crate::service::{NoteDraft, NotesService, ServiceResult};
use chrono::Utc;
use std::cell::RefCell;
use std::rc::Rc;

/// Notes service over a shared in-memory collection.
///
/// Honors the same contract as the local backend, including `updated_at`
/// descending order from `list`. The collection is behind `Rc<RefCell<..>>`
/// so a test can keep a [`handle`](Self::handle) and mutate the backing
/// store behind the consumer's back — the way to simulate a delete landing
/// between two store actions.
#[derive(Default)]
pub struct MemoryNotesService {
    notes: Rc<RefCell<Vec<Note>>>,
}

impl MemoryNotesService {
    /// Creates an empty in-memory service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service pre-populated with `notes`.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            notes: Rc::new(RefCell::new(notes)),
        }
    }

    /// Returns a handle onto the backing collection.
    pub fn handle(&self) -> Rc<RefCell<Vec<Note>>> {
        Rc::clone(&self.notes)
    }
}

impl NotesService for MemoryNotesService {
    fn list(&self) -> ServiceResult<Vec<Note>> {
        let mut notes = self.notes.borrow().clone();
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
        self.notes.borrow_mut().push(note.clone());
        Ok(note)
    }

    fn get(&self, id: &NoteId) -> ServiceResult<Option<Note>> {
        Ok(self.notes.borrow().iter().find(|n| n.id() == id).cloned())
    }

    fn update(&mut self, id: &NoteId, fields: NoteFields) -> ServiceResult<Option<Note>> {
        let mut notes = self.notes.borrow_mut();
        let Some(index) = notes.iter().position(|n| n.id() == id) else {
            return Ok(None);
        };

        let merged = notes[index].with_fields(&fields).touched(Utc::now());
        notes[index] = merged.clone();
        Ok(Some(merged))
    }

    fn remove(&mut self, id: &NoteId) -> ServiceResult<bool> {
        self.notes.borrow_mut().retain(|n| n.id() != id);
        Ok(true)
    }

    fn seed_if_empty(&mut self) -> ServiceResult<()> {
        let empty = self.notes.borrow().is_empty();
        if empty {
            let now = Utc::now();
            self.notes.borrow_mut().extend([
                Note::new(NoteId::new(), "Welcome to Reef", "# Reef\n\nSample note.", now),
                Note::new(
                    NoteId::new(),
                    "Daily Journal",
                    "Write your thoughts here...",
                    now - chrono::Duration::hours(1),
                ),
            ]);
        }
        Ok(())
    }
}
