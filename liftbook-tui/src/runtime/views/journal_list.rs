use crate::app::{App, ConfirmKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_journal_list_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if let Some(input) = app.author_input.as_mut() {
        match key.code {
            KeyCode::Enter => {
                let author = input.value.clone();
                app.author_input = None;
                enqueue_action(action_tx, Action::SetAuthor(author));
            }
            KeyCode::Esc => app.author_input = None,
            KeyCode::Backspace => input.backspace(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.home(),
            KeyCode::End => input.end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.insert(c)
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Down | KeyCode::Char('j') => app.move_journal_selection(true),
        KeyCode::Up | KeyCode::Char('k') => app.move_journal_selection(false),
        KeyCode::Enter => {
            if let Some(journal) = app.selected_journal() {
                enqueue_action(action_tx, Action::OpenJournal(journal.id));
            }
        }
        KeyCode::Char('n') => enqueue_action(action_tx, Action::AddJournal),
        KeyCode::Char('d') => {
            if let Some(journal) = app.selected_journal() {
                let (id, label) = (journal.id, journal.title(app.offset));
                app.ask_confirm(ConfirmKind::DeleteJournal(id), " Delete Journal? ", label);
            }
        }
        KeyCode::Char('m') => {
            if let Some(journal) = app.selected_journal() {
                enqueue_action(action_tx, Action::CycleListMuscleGroup(journal.id));
            }
        }
        KeyCode::Char('a') => app.begin_author_edit(),
        KeyCode::Char('c') => enqueue_action(action_tx, Action::LoadCatalog),
        KeyCode::Char('r') => enqueue_action(action_tx, Action::LoadJournals),
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftbook::{InMemoryStore, JournalList};
    use time::UtcOffset;

    use super::super::super::action_queue::channel;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn trigger(app: &mut App, code: KeyCode) -> Option<Action> {
        let (tx, mut rx) = channel();
        handle_journal_list_key(press(code), app, &tx);
        rx.try_recv().ok()
    }

    async fn loaded_list(store: &InMemoryStore) -> JournalList {
        let mut list = JournalList::new("jdoe");
        list.load(store).await.unwrap();
        list
    }

    #[test]
    fn typing_an_author_submits_on_enter() {
        let mut app = App::new("", UtcOffset::UTC);
        assert_eq!(trigger(&mut app, KeyCode::Char('a')), None);

        for c in "JDoe".chars() {
            assert_eq!(trigger(&mut app, KeyCode::Char(c)), None);
        }

        assert_eq!(
            trigger(&mut app, KeyCode::Enter),
            Some(Action::SetAuthor("JDoe".to_string()))
        );
        assert!(app.author_input.is_none());
    }

    #[tokio::test]
    async fn delete_asks_before_queueing_anything() {
        let store = InMemoryStore::new();
        let journal = store.seed_journal("jdoe", None);
        let mut app = App::new("jdoe", UtcOffset::UTC);
        app.journals = loaded_list(&store).await;

        assert_eq!(trigger(&mut app, KeyCode::Char('d')), None);
        let confirm = app.confirm.as_ref().unwrap();
        assert_eq!(confirm.kind, ConfirmKind::DeleteJournal(journal.id));
    }

    #[tokio::test]
    async fn enter_opens_the_selected_journal() {
        let store = InMemoryStore::new();
        let older = store.seed_journal("jdoe", None);
        store.seed_journal("jdoe", None);
        let mut app = App::new("jdoe", UtcOffset::UTC);
        app.journals = loaded_list(&store).await;

        trigger(&mut app, KeyCode::Char('j'));
        assert_eq!(
            trigger(&mut app, KeyCode::Enter),
            Some(Action::OpenJournal(older.id))
        );
    }

    #[test]
    fn empty_list_ignores_enter() {
        let mut app = App::new("jdoe", UtcOffset::UTC);
        assert_eq!(trigger(&mut app, KeyCode::Enter), None);
    }
}
