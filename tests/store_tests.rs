//! Store behavior tests against the in-memory backend.
//!
//! These exercise the store's synchronization contract: optimistic edits,
//! save/delete flows, search projection, and the subscriber protocol.

use reef::domain::NoteFields;
use reef::service::{MemoryNotesService, NoteDraft, NotesService};
use reef::store::NotesStore;
use std::cell::RefCell;
use std::rc::Rc;

fn empty_store() -> NotesStore {
    NotesStore::new(Box::new(MemoryNotesService::new()))
}

// ===========================================
// Note count invariants
// ===========================================

#[test]
fn note_count_tracks_creates_minus_deletes() {
    let mut store = empty_store();

    for _ in 0..5 {
        store.create_note();
    }
    assert_eq!(store.notes().len(), 5);

    for _ in 0..2 {
        store.delete_selected();
    }
    assert_eq!(store.notes().len(), 3);

    store.create_note();
    assert_eq!(store.notes().len(), 4);
}

#[test]
fn deleting_the_only_note_leaves_empty_state() {
    let mut store = empty_store();
    store.create_note();
    assert!(store.selected().is_some());

    store.delete_selected();
    assert!(store.selected().is_none());
    assert!(store.notes().is_empty());
    assert!(store.state().selected_id().is_none());
}

#[test]
fn delete_reselects_first_remaining_note() {
    let mut store = empty_store();
    store.create_note();
    store.create_note();

    store.delete_selected();
    assert_eq!(store.notes().len(), 1);
    assert!(store.selected().is_some(), "selection falls back to a survivor");
}

// ===========================================
// Optimistic edit path
// ===========================================

#[test]
fn update_selected_applies_without_backend_round_trip() {
    let mut store = empty_store();
    store.create_note();

    let saving_seen = Rc::new(RefCell::new(false));
    let saving_seen_in = Rc::clone(&saving_seen);
    store.subscribe(move |state| {
        if state.saving() {
            *saving_seen_in.borrow_mut() = true;
        }
    });

    store.update_selected(NoteFields::new().title("X"));

    assert_eq!(store.selected().unwrap().title(), "X");
    assert!(
        !*saving_seen.borrow(),
        "optimistic edit must not transition through saving"
    );
    assert!(store.state().dirty());
}

#[test]
fn optimistic_edit_is_preserved_when_save_misses() {
    let service = MemoryNotesService::new();
    let backing = service.handle();
    let mut store = NotesStore::new(Box::new(service));

    store.create_note();
    let id = store.state().selected_id().unwrap().clone();
    let stamped_at_create = store.state().last_saved_at();
    store.update_selected(NoteFields::new().content("unsaved text"));

    // A concurrent path deletes the note before the save lands.
    backing.borrow_mut().retain(|n| n.id() != &id);
    store.save_selected_note();

    assert!(!store.state().saving());
    assert_eq!(
        store.selected().unwrap().content(),
        "unsaved text",
        "user text survives a failed save"
    );
    assert_eq!(
        store.state().last_saved_at(),
        stamped_at_create,
        "no confirmation given for the failed save"
    );
}

#[test]
fn successful_save_stamps_last_saved_at_and_clears_dirty() {
    let mut store = empty_store();
    store.create_note();
    store.update_selected(NoteFields::new().title("Kept"));

    store.save_selected_note();

    assert!(!store.state().saving());
    assert!(!store.state().dirty());
    assert!(store.state().last_saved_at().is_some());
    assert_eq!(store.selected().unwrap().title(), "Kept");
}

// ===========================================
// Search projection
// ===========================================

#[test]
fn search_filters_by_title_or_content_case_insensitively() {
    let mut service = MemoryNotesService::new();
    service
        .create(NoteDraft::new().title("Daily Journal").content("today was fine"))
        .unwrap();
    service
        .create(NoteDraft::new().title("Groceries").content("my journal of food"))
        .unwrap();
    service
        .create(NoteDraft::new().title("Plans").content("nothing relevant"))
        .unwrap();

    let mut store = NotesStore::new(Box::new(service));
    store.refresh();

    store.set_search("journal");
    let titles: Vec<&str> = store.notes().iter().map(|n| n.title()).collect();
    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Daily Journal"), "matched via title");
    assert!(titles.contains(&"Groceries"), "matched via content");
}

#[test]
fn clearing_search_restores_full_list_in_original_order() {
    let mut store = empty_store();
    for _ in 0..3 {
        store.create_note();
    }

    let before: Vec<String> = store.notes().iter().map(|n| n.id().to_string()).collect();

    store.set_search("no such note anywhere");
    assert!(store.notes().is_empty());

    store.set_search("");
    let after: Vec<String> = store.notes().iter().map(|n| n.id().to_string()).collect();
    assert_eq!(before, after);
}

#[test]
fn search_never_mutates_stored_notes() {
    let mut store = empty_store();
    store.create_note();
    store.set_search("zzz");
    assert_eq!(store.state().notes().len(), 1, "stored collection untouched");
}

// ===========================================
// Subscriber protocol
// ===========================================

#[test]
fn subscriber_fires_once_on_registration_then_per_replacement() {
    let mut store = empty_store();
    let calls = Rc::new(RefCell::new(0u32));
    let calls_in = Rc::clone(&calls);

    store.subscribe(move |_| *calls_in.borrow_mut() += 1);
    assert_eq!(*calls.borrow(), 1, "exactly once, synchronously, at registration");

    store.set_search("a");
    store.set_preview(true);
    assert_eq!(*calls.borrow(), 3);
}

#[test]
fn subscribers_are_notified_in_subscription_order() {
    let mut store = empty_store();
    let order = Rc::new(RefCell::new(Vec::new()));

    let order_a = Rc::clone(&order);
    store.subscribe(move |_| order_a.borrow_mut().push("a"));
    let order_b = Rc::clone(&order);
    store.subscribe(move |_| order_b.borrow_mut().push("b"));

    order.borrow_mut().clear();
    store.set_preview(true);

    assert_eq!(*order.borrow(), vec!["a", "b"]);
}

#[test]
fn panicking_subscriber_does_not_block_the_rest() {
    // Quiet the default panic printer; the panic here is deliberate.
    std::panic::set_hook(Box::new(|_| {}));

    let mut store = empty_store();
    store.subscribe(|state| {
        if state.preview() {
            panic!("subscriber fault");
        }
    });

    let calls = Rc::new(RefCell::new(0u32));
    let calls_in = Rc::clone(&calls);
    store.subscribe(move |_| *calls_in.borrow_mut() += 1);

    store.set_preview(true);
    let _ = std::panic::take_hook();

    assert_eq!(*calls.borrow(), 2, "second subscriber still notified");
    assert!(store.state().preview(), "store state unaffected by the fault");
}

// ===========================================
// Degraded backend
// ===========================================

#[test]
fn store_stays_consistent_over_an_always_empty_backend() {
    let service = MemoryNotesService::new();
    let backing = service.handle();
    let mut store = NotesStore::new(Box::new(service));

    store.initialize();
    // Simulate a medium that loses everything between actions.
    backing.borrow_mut().clear();

    store.refresh();
    assert!(store.notes().is_empty());
    assert!(store.selected().is_none(), "selection is stale but tolerated");

    store.save_selected_note();
    store.delete_selected();
    assert!(!store.state().saving());
}
