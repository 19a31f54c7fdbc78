use anyhow::Result;
use liftbook::{
    domain::{ExerciseField, Journal, JournalId, MuscleGroup, Timestamp},
    Confirmation, JournalEntries, JournalStore,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::app::{App, ConfirmKind, View};
use crate::author_store;

use super::action_queue::Action;

pub(super) async fn run_action(
    action: Action,
    app: &mut App,
    store: &dyn JournalStore,
) -> Result<()> {
    match action {
        Action::LoadJournals => load_journals(app, store).await,
        Action::SetAuthor(author) => set_author(app, store, &author).await,
        Action::AddJournal => add_journal(app, store).await,
        Action::CycleListMuscleGroup(id) => cycle_list_muscle_group(app, store, id).await,
        Action::OpenJournal(id) => open_journal(app, store, id).await,
        Action::ReloadJournal => reload_journal(app, store).await,
        Action::CloseJournal => close_journal(app, store).await,
        Action::StartJournal => start_journal(app, store).await,
        Action::CycleMuscleGroup => cycle_muscle_group(app, store).await,
        Action::AddEntry => add_entry(app, store).await,
        Action::AddExercise { entry } => add_exercise(app, store, entry).await,
        Action::EditExercise {
            entry,
            row,
            field,
            value,
        } => edit_exercise(app, store, entry, row, field, &value).await,
        Action::CompleteSet { entry, set } => complete_set(app, store, entry, set).await,
        Action::FlushNotes => flush_notes(app, store).await,
        Action::ResolveConfirm(confirmation) => resolve_confirm(app, store, confirmation).await,
        Action::LoadCatalog => load_catalog(app, store).await,
    }
    Ok(())
}

/// Read failures stay on the container's load state; the view offers a retry.
async fn load_journals(app: &mut App, store: &dyn JournalStore) {
    app.is_loading = true;
    if let Err(e) = app.journals.load(store).await {
        warn!(error = %e, "journal list load failed");
    }
    app.clamp_journal_selection();
    app.is_loading = false;
}

async fn set_author(app: &mut App, store: &dyn JournalStore, author: &str) {
    if !app.journals.set_author(author) {
        return;
    }
    app.selected_journal = 0;
    match author_store::save_author(app.journals.author()) {
        Ok(()) => info!(author = app.journals.author(), "author changed"),
        Err(e) => {
            warn!(error = %e, "author not persisted");
            app.set_status(format!("Could not save author: {}", e));
        }
    }
    load_journals(app, store).await;
}

async fn add_journal(app: &mut App, store: &dyn JournalStore) {
    let result = app.journals.add(store).await.map(|_| ());
    match result {
        Ok(()) => app.selected_journal = 0,
        Err(e) => app.show_error(&e),
    }
}

async fn cycle_list_muscle_group(app: &mut App, store: &dyn JournalStore, id: JournalId) {
    let Some(journal) = app.journals.get(id).cloned() else {
        return;
    };
    let changed = Journal {
        muscle_group: Some(next_muscle_group(journal.muscle_group)),
        ..journal
    };
    if let Err(e) = app.journals.change(store, &changed).await {
        app.show_error(&e);
    }
    app.clamp_journal_selection();
}

/// An unset group starts the cycle at push.
fn next_muscle_group(current: Option<MuscleGroup>) -> MuscleGroup {
    current.map_or(MuscleGroup::Push, MuscleGroup::next)
}

async fn open_journal(app: &mut App, store: &dyn JournalStore, id: JournalId) {
    let Some(journal) = app.journals.get(id).cloned() else {
        return;
    };
    let mut entries = JournalEntries::new(journal);
    app.is_loading = true;
    if let Err(e) = entries.load(store).await {
        warn!(error = %e, journal_id = %id, "journal load failed");
    }
    app.is_loading = false;
    app.open(entries);
}

async fn reload_journal(app: &mut App, store: &dyn JournalStore) {
    let Some(journal) = app.open_journal.as_mut() else {
        return;
    };
    if let Err(e) = journal.load(store).await {
        warn!(error = %e, "journal reload failed");
    }
    app.clamp_cursor();
}

async fn close_journal(app: &mut App, store: &dyn JournalStore) {
    if let Some(journal) = app.open_journal.as_mut() {
        if let Err(e) = journal.save_pending_notes(store).await {
            app.show_error(&e);
            return;
        }
    }
    app.close_journal();
    load_journals(app, store).await;
}

async fn start_journal(app: &mut App, store: &dyn JournalStore) {
    let Some(journal) = app.open_journal.as_mut() else {
        return;
    };
    if let Err(e) = journal.start(store, Timestamp::now()).await {
        app.show_error(&e);
    }
}

async fn cycle_muscle_group(app: &mut App, store: &dyn JournalStore) {
    let Some(journal) = app.open_journal.as_mut() else {
        return;
    };
    let next = next_muscle_group(journal.journal().muscle_group);
    if let Err(e) = journal.set_muscle_group(store, next).await {
        app.show_error(&e);
    }
}

async fn add_entry(app: &mut App, store: &dyn JournalStore) {
    let Some(journal) = app.open_journal.as_mut() else {
        return;
    };
    match journal.add_entry(store).await {
        Ok(()) => {
            app.cursor.entry = journal.groups().len().saturating_sub(1);
            app.cursor.row = 0;
        }
        Err(e) => app.show_error(&e),
    }
}

async fn add_exercise(app: &mut App, store: &dyn JournalStore, entry: usize) {
    let Some(journal) = app.open_journal.as_mut() else {
        return;
    };
    match journal.add_exercise(store, entry).await {
        Ok(()) => {
            let rows = journal
                .groups()
                .get(entry)
                .map(|g| g.table().rows().len())
                .unwrap_or(0);
            app.cursor.entry = entry;
            app.cursor.row = rows.saturating_sub(1);
        }
        Err(e) => app.show_error(&e),
    }
}

async fn edit_exercise(
    app: &mut App,
    store: &dyn JournalStore,
    entry: usize,
    row: usize,
    field: ExerciseField,
    value: &str,
) {
    let Some(journal) = app.open_journal.as_mut() else {
        return;
    };
    if let Err(e) = journal.edit_exercise(store, entry, row, field, value).await {
        app.show_error(&e);
    }
    app.clamp_cursor();
}

async fn complete_set(app: &mut App, store: &dyn JournalStore, entry: usize, set: usize) {
    let Some(journal) = app.open_journal.as_mut() else {
        return;
    };
    match journal.complete_set(store, entry, set, Timestamp::now()).await {
        Ok(true) => app.set_status("Journal finished".to_string()),
        Ok(false) => {}
        Err(e) => app.show_error(&e),
    }
}

async fn flush_notes(app: &mut App, store: &dyn JournalStore) {
    let Some(journal) = app.open_journal.as_mut() else {
        return;
    };
    if let Err(e) = journal.flush_notes(store, Instant::now()).await {
        app.show_error(&e);
    }
}

async fn resolve_confirm(app: &mut App, store: &dyn JournalStore, confirmation: Confirmation) {
    let Some(context) = app.confirm.take() else {
        return;
    };
    match context.kind {
        ConfirmKind::DeleteJournal(id) => {
            let result = app.journals.remove(store, id, confirmation).await;
            match result {
                Ok(_) => app.clamp_journal_selection(),
                Err(e) => app.show_error(&e),
            }
        }
        ConfirmKind::DeleteEntry(entry) => {
            let Some(journal) = app.open_journal.as_mut() else {
                return;
            };
            if let Err(e) = journal.delete_entry(store, entry, confirmation).await {
                app.show_error(&e);
            }
            app.clamp_cursor();
        }
        ConfirmKind::CopyJournal => {
            let Some(journal) = app.open_journal.as_ref() else {
                return;
            };
            let result = journal.copy_to_today(store, confirmation).await;
            match result {
                Ok(Some(copy)) => {
                    load_journals(app, store).await;
                    if let Some(journal) = app.open_journal.as_mut() {
                        if let Err(e) = journal.save_pending_notes(store).await {
                            app.show_error(&e);
                            return;
                        }
                    }
                    info!(copy_id = %copy.id, "opened copied journal");
                    app.close_journal();
                    open_journal(app, store, copy.id).await;
                }
                Ok(None) => {}
                Err(e) => {
                    app.show_error(&e);
                    load_journals(app, store).await;
                }
            }
        }
    }
}

async fn load_catalog(app: &mut App, store: &dyn JournalStore) {
    app.is_loading = true;
    if let Err(e) = app.catalog.load(store).await {
        warn!(error = %e, "catalog load failed");
    }
    app.is_loading = false;
    if app.current_view != View::Catalog {
        app.navigate_to(View::Catalog);
    }
    app.catalog_scroll = 0;
}
