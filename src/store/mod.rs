//! Subscribable state store coordinating notes with the persistence backend.
//!
//! One [`NotesStore`] instance exists per running application and is passed
//! by reference to consumers; there is no global state, so tests get a fresh
//! store each. Every mutating action replaces the whole state object and
//! then synchronously notifies subscribers in subscription order, so a
//! reader always observes a fully consistent snapshot.
//!
//! Actions run to completion, including backend I/O, before the next action
//! is processed. An interleaved delete-then-save resolves through the
//! backend returning `None` from `update`, which clears the saving flag and
//! preserves the in-memory edit.

use crate::domain::{Note, NoteFields, NoteId};
use crate::service::{NoteDraft, NotesService};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::panic::{self, AssertUnwindSafe};

/// Snapshot of the store's state, replaced wholesale on every mutation.
#[derive(Clone, Debug)]
pub struct StoreState {
    notes: Vec<Note>,
    selected_id: Option<NoteId>,
    search: String,
    preview: bool,
    last_saved_at: Option<DateTime<Utc>>,
    saving: bool,
    dirty: bool,
}

impl StoreState {
    fn initial() -> Self {
        Self {
            notes: Vec::new(),
            selected_id: None,
            search: String::new(),
            preview: false,
            last_saved_at: None,
            saving: false,
            dirty: false,
        }
    }

    /// Returns the unfiltered note collection in backend order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns the notes matching the current search term, order preserved.
    ///
    /// An empty or blank search returns every note. This is a pure
    /// projection; the stored collection is never mutated by filtering.
    pub fn filtered_notes(&self) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| n.matches_query(&self.search))
            .collect()
    }

    /// Returns the id of the currently selected note, if any.
    pub fn selected_id(&self) -> Option<&NoteId> {
        self.selected_id.as_ref()
    }

    /// Returns the selected note, or `None` when the selection is unset or
    /// transiently stale (e.g. points at a just-deleted note).
    pub fn selected(&self) -> Option<&Note> {
        let id = self.selected_id.as_ref()?;
        self.notes.iter().find(|n| n.id() == id)
    }

    /// Returns the current search term.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Returns whether preview mode is on.
    pub fn preview(&self) -> bool {
        self.preview
    }

    /// Returns when a save last completed, if ever.
    pub fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.last_saved_at
    }

    /// Returns whether a save is in flight.
    pub fn saving(&self) -> bool {
        self.saving
    }

    /// Returns whether the in-memory copy has diverged from the last
    /// confirmed persisted value (an optimistic edit awaiting a save).
    pub fn dirty(&self) -> bool {
        self.dirty
    }
}

/// Capability to unsubscribe a previously registered callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Callback = Box<dyn Fn(&StoreState)>;

/// State container plus action set over a pluggable persistence backend.
pub struct NotesStore {
    service: Box<dyn NotesService>,
    state: StoreState,
    subscribers: Vec<(SubscriberId, Callback)>,
    next_subscriber: u64,
}

impl NotesStore {
    /// Creates a store over `service` with empty initial state.
    pub fn new(service: Box<dyn NotesService>) -> Self {
        Self {
            service,
            state: StoreState::initial(),
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    /// Returns the current state snapshot.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Returns the notes matching the current search term.
    pub fn notes(&self) -> Vec<&Note> {
        self.state.filtered_notes()
    }

    /// Returns the currently selected note, if any.
    pub fn selected(&self) -> Option<&Note> {
        self.state.selected()
    }

    /// Seeds the backend if empty, fetches the collection, and selects the
    /// first note (or none). Idempotent when notes already exist.
    pub fn initialize(&mut self) {
        if let Err(err) = self.service.seed_if_empty() {
            warn!("seeding failed: {err}");
        }

        let notes = self.fetch();
        let selected = notes.first().map(|n| n.id().clone());
        self.replace(move |state| {
            state.notes = notes;
            state.selected_id = selected;
            state.dirty = false;
        });
    }

    /// Registers `callback` for state notifications.
    ///
    /// The callback is invoked once immediately with the current state, then
    /// once after every subsequent state replacement, in subscription order.
    /// A panicking callback is isolated: it is logged and the remaining
    /// subscribers are still notified.
    pub fn subscribe(&mut self, callback: impl Fn(&StoreState) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;

        let callback: Callback = Box::new(callback);
        Self::invoke(id, &callback, &self.state);
        self.subscribers.push((id, callback));
        id
    }

    /// Removes a subscriber; unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Sets the search term. Pure state update, no backend I/O.
    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.replace(move |state| state.search = query);
    }

    /// Toggles preview mode. Pure state update, no backend I/O.
    pub fn set_preview(&mut self, on: bool) {
        self.replace(move |state| state.preview = on);
    }

    /// Refetches the collection from the backend, keeping the selection.
    pub fn refresh(&mut self) {
        let notes = self.fetch();
        self.replace(move |state| {
            state.notes = notes;
            state.dirty = false;
        });
    }

    /// Creates a note with default title and empty content, refetches, and
    /// selects the newly created note.
    pub fn create_note(&mut self) {
        match self.service.create(NoteDraft::new()) {
            Ok(created) => {
                let notes = self.fetch();
                let selected = Some(created.id().clone());
                self.replace(move |state| {
                    state.notes = notes;
                    state.selected_id = selected;
                    state.last_saved_at = Some(Utc::now());
                    state.dirty = false;
                });
            }
            Err(err) => warn!("create failed: {err}"),
        }
    }

    /// Sets the selection unconditionally.
    ///
    /// No existence check: selecting an unknown id simply yields
    /// [`selected`](Self::selected) `== None` until corrected.
    pub fn select_note(&mut self, id: NoteId) {
        self.replace(move |state| state.selected_id = Some(id));
    }

    /// Merges `fields` into the selected note's in-memory copy and
    /// republishes state immediately, without contacting the backend.
    ///
    /// This is the optimistic edit path used while typing; the divergence is
    /// marked via [`StoreState::dirty`] until a save or refetch reconciles
    /// it. No-op when nothing is selected.
    pub fn update_selected(&mut self, fields: NoteFields) {
        let Some(current) = self.state.selected().cloned() else {
            return;
        };

        let updated = current.with_fields(&fields);
        self.replace(move |state| {
            for note in state.notes.iter_mut() {
                if note.id() == updated.id() {
                    *note = updated.clone();
                }
            }
            state.dirty = true;
        });
    }

    /// Persists the selected note's current in-memory title and content.
    ///
    /// Publishes `saving = true` before the backend call. On success the
    /// collection is refetched, `saving` cleared, and `last_saved_at`
    /// stamped. On a persistence miss or backend failure only `saving` is
    /// cleared — the in-memory edit is preserved so no text is lost, but no
    /// confirmation is given. No-op when nothing is selected.
    pub fn save_selected_note(&mut self) {
        let Some(current) = self.state.selected().cloned() else {
            return;
        };

        self.replace(|state| state.saving = true);

        let fields = NoteFields::new()
            .title(current.title())
            .content(current.content());

        match self.service.update(current.id(), fields) {
            Ok(Some(_)) => {
                let notes = self.fetch();
                self.replace(move |state| {
                    state.notes = notes;
                    state.saving = false;
                    state.last_saved_at = Some(Utc::now());
                    state.dirty = false;
                });
            }
            Ok(None) => {
                debug!("save miss: note {} no longer exists", current.id());
                self.replace(|state| state.saving = false);
            }
            Err(err) => {
                warn!("save failed: {err}");
                self.replace(|state| state.saving = false);
            }
        }
    }

    /// Removes the selected note, refetches, and reselects the first
    /// remaining note or none. No-op when nothing is selected.
    pub fn delete_selected(&mut self) {
        let Some(current) = self.state.selected().cloned() else {
            return;
        };

        match self.service.remove(current.id()) {
            Ok(_) => {
                let notes = self.fetch();
                let selected = notes.first().map(|n| n.id().clone());
                self.replace(move |state| {
                    state.notes = notes;
                    state.selected_id = selected;
                    state.last_saved_at = Some(Utc::now());
                    state.dirty = false;
                });
            }
            Err(err) => {
                warn!("delete failed: {err}");
                self.refresh();
            }
        }
    }

    fn fetch(&self) -> Vec<Note> {
        self.service.list().unwrap_or_else(|err| {
            warn!("list failed: {err}; treating backend as empty");
            Vec::new()
        })
    }

    /// Whole-object state swap followed by a full notification pass.
    fn replace(&mut self, mutate: impl FnOnce(&mut StoreState)) {
        let mut next = self.state.clone();
        mutate(&mut next);
        self.state = next;
        self.notify();
    }

    fn notify(&self) {
        for (id, callback) in &self.subscribers {
            Self::invoke(*id, callback, &self.state);
        }
    }

    fn invoke(id: SubscriberId, callback: &Callback, state: &StoreState) {
        if panic::catch_unwind(AssertUnwindSafe(|| callback(state))).is_err() {
            warn!("subscriber {id:?} panicked during notification");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MemoryNotesService;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn empty_store() -> NotesStore {
        NotesStore::new(Box::new(MemoryNotesService::new()))
    }

    #[test]
    fn initial_state_is_empty() {
        let store = empty_store();
        assert!(store.state().notes().is_empty());
        assert!(store.selected().is_none());
        assert_eq!(store.state().search(), "");
        assert!(!store.state().preview());
        assert!(!store.state().saving());
        assert!(!store.state().dirty());
        assert!(store.state().last_saved_at().is_none());
    }

    #[test]
    fn initialize_seeds_and_selects_first() {
        let mut store = empty_store();
        store.initialize();

        assert_eq!(store.state().notes().len(), 2);
        let first_id = store.state().notes()[0].id().clone();
        assert_eq!(store.state().selected_id(), Some(&first_id));
    }

    #[test]
    fn initialize_is_idempotent_with_existing_notes() {
        let mut store = empty_store();
        store.initialize();
        store.initialize();
        assert_eq!(store.state().notes().len(), 2);
    }

    #[test]
    fn subscribe_fires_immediately() {
        let mut store = empty_store();
        let calls = Rc::new(RefCell::new(0));
        let calls_in = Rc::clone(&calls);

        store.subscribe(move |_| *calls_in.borrow_mut() += 1);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut store = empty_store();
        let calls = Rc::new(RefCell::new(0));
        let calls_in = Rc::clone(&calls);

        let id = store.subscribe(move |_| *calls_in.borrow_mut() += 1);
        store.unsubscribe(id);
        store.set_search("x");

        assert_eq!(*calls.borrow(), 1, "only the immediate invocation");
    }

    #[test]
    fn select_unknown_id_yields_no_selected_note() {
        let mut store = empty_store();
        store.initialize();
        store.select_note(NoteId::new());
        assert!(store.selected().is_none());
        assert!(store.state().selected_id().is_some());
    }

    #[test]
    fn update_selected_without_selection_is_noop() {
        let mut store = empty_store();
        let calls = Rc::new(RefCell::new(0));
        let calls_in = Rc::clone(&calls);
        store.subscribe(move |_| *calls_in.borrow_mut() += 1);

        store.update_selected(NoteFields::new().title("ghost"));
        assert_eq!(*calls.borrow(), 1, "no notification for a no-op");
    }

    #[test]
    fn save_without_selection_is_noop() {
        let mut store = empty_store();
        store.save_selected_note();
        assert!(!store.state().saving());
        assert!(store.state().last_saved_at().is_none());
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let mut store = empty_store();
        store.delete_selected();
        assert!(store.state().notes().is_empty());
    }

    #[test]
    fn set_preview_toggles_flag() {
        let mut store = empty_store();
        store.set_preview(true);
        assert!(store.state().preview());
        store.set_preview(false);
        assert!(!store.state().preview());
    }

    #[test]
    fn update_selected_marks_dirty_and_save_clears_it() {
        let mut store = empty_store();
        store.create_note();
        assert!(!store.state().dirty());

        store.update_selected(NoteFields::new().title("Edited"));
        assert!(store.state().dirty());

        store.save_selected_note();
        assert!(!store.state().dirty());
    }

    #[test]
    fn refresh_reconciles_optimistic_edit() {
        let mut store = empty_store();
        store.create_note();
        store.update_selected(NoteFields::new().title("Unsaved"));

        store.refresh();
        assert_eq!(store.selected().unwrap().title(), "Untitled");
        assert!(!store.state().dirty());
    }
}
