use crate::app::{App, ConfirmKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_journal_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.cell_edit.is_some() {
        handle_cell_edit_key(key, app, action_tx);
    } else if app.notes_input.is_some() {
        handle_notes_key(key, app);
    } else {
        handle_table_key(key, app, action_tx);
    }
}

fn handle_cell_edit_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let Some(edit) = app.cell_edit.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Enter => {
            if let Some(edit) = app.cell_edit.take() {
                enqueue_action(
                    action_tx,
                    Action::EditExercise {
                        entry: edit.entry,
                        row: edit.row,
                        field: edit.field,
                        value: edit.input.value,
                    },
                );
            }
        }
        KeyCode::Esc => app.cell_edit = None,
        KeyCode::Backspace => edit.input.backspace(),
        KeyCode::Left => edit.input.move_left(),
        KeyCode::Right => edit.input.move_right(),
        KeyCode::Home => edit.input.home(),
        KeyCode::End => edit.input.end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            edit.input.insert(c)
        }
        _ => {}
    }
}

/// Every keystroke feeds the debounced draft; the event loop sends it.
fn handle_notes_key(key: KeyEvent, app: &mut App) {
    let Some(input) = app.notes_input.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            app.notes_input = None;
            return;
        }
        KeyCode::Enter => input.insert('\n'),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
        _ => return,
    }
    app.sync_notes_draft(Instant::now());
}

fn handle_table_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    let entry = app.cursor.entry;
    let has_entry = app
        .open_journal
        .as_ref()
        .is_some_and(|j| entry < j.groups().len());

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.move_row(true),
        KeyCode::Up | KeyCode::Char('k') => app.move_row(false),
        KeyCode::Left | KeyCode::Char('h') => app.move_column(false),
        KeyCode::Right | KeyCode::Char('l') => app.move_column(true),
        KeyCode::Char(']') => app.move_entry(true),
        KeyCode::Char('[') => app.move_entry(false),
        KeyCode::Enter => {
            app.begin_cell_edit();
        }
        KeyCode::Char('s') => enqueue_action(action_tx, Action::StartJournal),
        KeyCode::Char('m') => enqueue_action(action_tx, Action::CycleMuscleGroup),
        KeyCode::Char('g') => enqueue_action(action_tx, Action::AddEntry),
        KeyCode::Char('e') if has_entry => {
            enqueue_action(action_tx, Action::AddExercise { entry })
        }
        KeyCode::Char('f') => {
            let next_set = app
                .open_journal
                .as_ref()
                .and_then(|j| j.groups().get(entry))
                .filter(|g| !g.is_done())
                .map(|g| g.entry().completed_sets());
            if let Some(set) = next_set {
                enqueue_action(action_tx, Action::CompleteSet { entry, set });
            }
        }
        KeyCode::Char('x') if has_entry => {
            app.ask_confirm(
                ConfirmKind::DeleteEntry(entry),
                " Delete Exercise Group? ",
                format!("Group {} and all of its exercises", entry + 1),
            );
        }
        KeyCode::Char('c') => {
            let label = app
                .open_journal
                .as_ref()
                .map(|j| j.journal().title(app.offset))
                .unwrap_or_default();
            app.ask_confirm(ConfirmKind::CopyJournal, " Copy To Today? ", label);
        }
        KeyCode::Char('o') => app.begin_notes_edit(),
        KeyCode::Char('r') => enqueue_action(action_tx, Action::ReloadJournal),
        KeyCode::Esc | KeyCode::Char('q') => enqueue_action(action_tx, Action::CloseJournal),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::View;
    use liftbook::{
        domain::{default_exercise, Exercise, ExerciseField},
        InMemoryStore, JournalEntries,
    };
    use time::UtcOffset;

    use super::super::super::action_queue::channel;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn trigger(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_journal_key(press(code), app, &tx);
        rx.try_recv().ok()
    }

    /// An app showing a journal with one entry of two planned sets.
    async fn app_with_open_journal() -> App {
        let store = InMemoryStore::new();
        let journal = store.seed_journal("jdoe", None);
        let entry = store.seed_entry(journal.id, vec![]).unwrap();
        store
            .seed_exercise(&Exercise {
                exercise_description: "squat".to_string(),
                exercise_sets: 2,
                ..default_exercise(entry.id)
            })
            .unwrap();
        let mut entries = JournalEntries::new(journal);
        entries.load(&store).await.unwrap();

        let mut app = App::new("jdoe", UtcOffset::UTC);
        app.open(entries);
        app
    }

    #[tokio::test]
    async fn finishing_targets_the_next_set() {
        let mut app = app_with_open_journal().await;
        assert_eq!(app.current_view, View::Journal);

        assert_eq!(
            trigger(&mut app, KeyCode::Char('f')),
            Some(Action::CompleteSet { entry: 0, set: 0 })
        );
    }

    #[tokio::test]
    async fn cell_edit_sends_the_typed_value() {
        let mut app = app_with_open_journal().await;
        trigger(&mut app, KeyCode::Char('l'));
        trigger(&mut app, KeyCode::Char('l'));

        assert_eq!(trigger(&mut app, KeyCode::Enter), None);
        let edit = app.cell_edit.as_ref().unwrap();
        assert_eq!(edit.field, ExerciseField::Sets);
        assert_eq!(edit.input.value, "2");

        trigger(&mut app, KeyCode::Backspace);
        trigger(&mut app, KeyCode::Char('5'));
        assert_eq!(
            trigger(&mut app, KeyCode::Enter),
            Some(Action::EditExercise {
                entry: 0,
                row: 0,
                field: ExerciseField::Sets,
                value: "5".to_string(),
            })
        );
        assert!(app.cell_edit.is_none());
    }

    #[tokio::test]
    async fn delete_and_copy_wait_for_confirmation() {
        let mut app = app_with_open_journal().await;

        assert_eq!(trigger(&mut app, KeyCode::Char('x')), None);
        assert_eq!(
            app.confirm.as_ref().map(|c| c.kind),
            Some(ConfirmKind::DeleteEntry(0))
        );

        app.confirm = None;
        assert_eq!(trigger(&mut app, KeyCode::Char('c')), None);
        assert_eq!(
            app.confirm.as_ref().map(|c| c.kind),
            Some(ConfirmKind::CopyJournal)
        );
    }

    #[tokio::test]
    async fn typing_notes_queues_a_draft() {
        let mut app = app_with_open_journal().await;
        trigger(&mut app, KeyCode::Char('o'));

        for c in "ok".chars() {
            assert_eq!(trigger(&mut app, KeyCode::Char(c)), None);
        }

        let journal = app.open_journal.as_ref().unwrap();
        assert_eq!(journal.notes(), "ok");
        assert!(journal.notes_pending());

        trigger(&mut app, KeyCode::Esc);
        assert!(app.notes_input.is_none());
        assert_eq!(app.current_view, View::Journal);
    }

    #[tokio::test]
    async fn escape_closes_the_journal() {
        let mut app = app_with_open_journal().await;
        assert_eq!(trigger(&mut app, KeyCode::Esc), Some(Action::CloseJournal));
    }
}
