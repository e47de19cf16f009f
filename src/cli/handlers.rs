//! Command handlers driving the notes store.

use anyhow::{Result, bail};
use clap::CommandFactory;
use std::path::PathBuf;

use crate::cli::config::Config;
use crate::cli::output::{NoteDetail, NoteListing, OutputFormat};
use crate::cli::{
    Cli, CompletionsArgs, EditArgs, ListArgs, NewArgs, RmArgs, SearchArgs, ShowArgs,
};
use crate::domain::{Note, NoteFields, NoteId};
use crate::render::render;
use crate::service::active_service;
use crate::store::NotesStore;

/// Opens a store over the configured backend and loads the collection.
///
/// Does not seed; only the explicit `seed` command (and the original UI's
/// bootstrap path, `initialize`) installs sample notes.
fn open_store(config: &Config, cli_data_file: Option<&PathBuf>) -> NotesStore {
    let service = active_service(
        config.api_base().as_deref(),
        config.data_file(cli_data_file),
    );
    let mut store = NotesStore::new(service);
    store.refresh();
    store
}

/// Resolves an ID or unique ID prefix against the loaded collection.
fn resolve_id(store: &NotesStore, prefix: &str) -> Result<NoteId> {
    let matches: Vec<&Note> = store
        .state()
        .notes()
        .iter()
        .filter(|n| n.id().matches_prefix(prefix))
        .collect();

    match matches.as_slice() {
        [] => bail!("no note matches id '{prefix}'"),
        [single] => Ok(single.id().clone()),
        many => bail!(
            "ambiguous id '{prefix}' matches {} notes; use a longer prefix",
            many.len()
        ),
    }
}

fn print_listing(notes: &[&Note], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => {
            for note in notes {
                println!(
                    "{}  {}  {}",
                    note.id().prefix(),
                    note.updated_at().format("%Y-%m-%d %H:%M"),
                    note.title()
                );
            }
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> =
                notes.iter().copied().map(NoteListing::from_note).collect();
            println!("{}", serde_json::to_string_pretty(&listings)?);
        }
    }
    Ok(())
}

/// Handles the `ls` command.
pub fn handle_list(args: &ListArgs, config: &Config, data_file: Option<&PathBuf>) -> Result<()> {
    let store = open_store(config, data_file);
    print_listing(&store.notes(), args.format)
}

/// Handles the `new` command.
pub fn handle_new(args: &NewArgs, config: &Config, data_file: Option<&PathBuf>) -> Result<()> {
    let mut store = open_store(config, data_file);

    store.create_note();
    let Some(created_id) = store.state().selected_id().cloned() else {
        bail!("failed to create note");
    };

    let mut fields = NoteFields::new();
    if let Some(title) = &args.title {
        fields = fields.title(title);
    }
    if let Some(content) = &args.content {
        fields = fields.content(content);
    }
    if !fields.is_empty() {
        store.update_selected(fields);
        store.save_selected_note();
        if store.state().dirty() {
            bail!("note was created but its initial fields could not be saved");
        }
    }

    let Some(note) = store.selected() else {
        bail!("failed to create note");
    };
    println!("Created {note}");
    println!("{created_id}");
    Ok(())
}

/// Handles the `show` command.
pub fn handle_show(args: &ShowArgs, config: &Config, data_file: Option<&PathBuf>) -> Result<()> {
    let mut store = open_store(config, data_file);
    let id = resolve_id(&store, &args.id)?;
    store.select_note(id);
    store.set_preview(args.preview);

    let Some(note) = store.selected() else {
        bail!("no note matches id '{}'", args.id);
    };

    if store.state().preview() {
        println!("{}", render(note.content()));
        return Ok(());
    }

    match args.format {
        OutputFormat::Human => {
            println!("# {} [{}]", note.title(), note.id().prefix());
            println!();
            println!("{}", note.content());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&NoteDetail::from_note(note))?);
        }
    }
    Ok(())
}

/// Handles the `edit` command.
pub fn handle_edit(args: &EditArgs, config: &Config, data_file: Option<&PathBuf>) -> Result<()> {
    let mut fields = NoteFields::new();
    if let Some(title) = &args.title {
        fields = fields.title(title);
    }
    if let Some(content) = &args.content {
        fields = fields.content(content);
    }
    if fields.is_empty() {
        bail!("nothing to edit: pass --title and/or --content");
    }

    let mut store = open_store(config, data_file);
    let id = resolve_id(&store, &args.id)?;
    store.select_note(id);

    store.update_selected(fields);
    store.save_selected_note();

    // A reconciled save clears the divergence marker; anything else means
    // the edit only lives in memory and would be lost on exit.
    if store.state().dirty() {
        bail!("note '{}' could not be saved", args.id);
    }

    let Some(note) = store.selected() else {
        bail!("note '{}' disappeared while saving", args.id);
    };
    println!("Saved {note}");
    Ok(())
}

/// Handles the `search` command.
pub fn handle_search(args: &SearchArgs, config: &Config, data_file: Option<&PathBuf>) -> Result<()> {
    let mut store = open_store(config, data_file);
    store.set_search(args.query.clone());
    print_listing(&store.notes(), args.format)
}

/// Selects and removes a note, returning its title.
///
/// The store swallows backend failures and refreshes instead, so success is
/// verified against the refreshed collection: if the note is still there,
/// the delete did not land.
fn delete_note(store: &mut NotesStore, id: &NoteId) -> Result<String> {
    let title = store
        .state()
        .notes()
        .iter()
        .find(|n| n.id() == id)
        .map(|n| n.title().to_string())
        .unwrap_or_default();

    store.select_note(id.clone());
    store.delete_selected();

    if store.state().notes().iter().any(|n| n.id() == id) {
        bail!("note '{title}' could not be deleted");
    }
    Ok(title)
}

/// Handles the `rm` command.
pub fn handle_rm(args: &RmArgs, config: &Config, data_file: Option<&PathBuf>) -> Result<()> {
    let mut store = open_store(config, data_file);
    let id = resolve_id(&store, &args.id)?;
    let title = delete_note(&mut store, &id)?;

    println!("Deleted {title}");
    Ok(())
}

/// Handles the `seed` command.
pub fn handle_seed(config: &Config, data_file: Option<&PathBuf>) -> Result<()> {
    let service = active_service(
        config.api_base().as_deref(),
        config.data_file(data_file),
    );
    let mut store = NotesStore::new(service);
    store.initialize();

    println!("{} notes in collection", store.state().notes().len());
    Ok(())
}

/// Handles the `completions` command.
pub fn handle_completions(args: &CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "reef", &mut std::io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::StorageError;
    use crate::service::{MemoryNotesService, NoteDraft, NotesService, ServiceResult};

    /// Service over a medium that rejects every delete.
    struct ReadOnlyService {
        inner: MemoryNotesService,
    }

    impl NotesService for ReadOnlyService {
        fn list(&self) -> ServiceResult<Vec<Note>> {
            self.inner.list()
        }

        fn create(&mut self, draft: NoteDraft) -> ServiceResult<Note> {
            self.inner.create(draft)
        }

        fn get(&self, id: &NoteId) -> ServiceResult<Option<Note>> {
            self.inner.get(id)
        }

        fn update(&mut self, id: &NoteId, fields: NoteFields) -> ServiceResult<Option<Note>> {
            self.inner.update(id, fields)
        }

        fn remove(&mut self, _id: &NoteId) -> ServiceResult<bool> {
            Err(StorageError::PermissionDenied {
                path: "/readonly/notes.json".into(),
            }
            .into())
        }

        fn seed_if_empty(&mut self) -> ServiceResult<()> {
            self.inner.seed_if_empty()
        }
    }

    fn store_with_titles(titles: &[&str]) -> NotesStore {
        let mut service = MemoryNotesService::new();
        for title in titles {
            service.create(NoteDraft::new().title(*title)).unwrap();
        }
        let mut store = NotesStore::new(Box::new(service));
        store.refresh();
        store
    }

    #[test]
    fn resolve_id_finds_unique_prefix() {
        let store = store_with_titles(&["Only"]);
        let full = store.state().notes()[0].id().clone();
        let resolved = resolve_id(&store, &full.prefix()).unwrap();
        assert_eq!(resolved, full);
    }

    #[test]
    fn resolve_id_rejects_unknown_prefix() {
        let store = store_with_titles(&["Only"]);
        let err = resolve_id(&store, "7ZZZZZZZ").unwrap_err();
        assert!(err.to_string().contains("no note matches"));
    }

    #[test]
    fn resolve_id_rejects_ambiguous_prefix() {
        let store = store_with_titles(&["A", "B"]);
        // Every ULID starts with a 0 digit for decades to come.
        let err = resolve_id(&store, "0").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn delete_note_removes_and_returns_title() {
        let mut store = store_with_titles(&["Doomed"]);
        let id = store.state().notes()[0].id().clone();

        let title = delete_note(&mut store, &id).unwrap();
        assert_eq!(title, "Doomed");
        assert!(store.state().notes().is_empty());
    }

    #[test]
    fn delete_note_fails_when_backend_keeps_the_note() {
        let mut inner = MemoryNotesService::new();
        inner.create(NoteDraft::new().title("Stuck")).unwrap();
        let mut store = NotesStore::new(Box::new(ReadOnlyService { inner }));
        store.refresh();

        let id = store.state().notes()[0].id().clone();
        let err = delete_note(&mut store, &id).unwrap_err();

        assert!(err.to_string().contains("could not be deleted"));
        assert_eq!(
            store.state().notes().len(),
            1,
            "note survives the failed delete"
        );
    }
}
