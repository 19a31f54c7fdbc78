use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use liftbook::Confirmation;

use super::action_queue::{Action, ActionTx};

mod catalog;
mod journal;
mod journal_list;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

pub(super) fn handle_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }
    // Alerts block everything until dismissed.
    if app.alert.is_some() {
        app.alert = None;
        return;
    }
    if app.confirm.is_some() {
        handle_confirm_key(key, action_tx);
        return;
    }
    match app.current_view {
        View::Journals => journal_list::handle_journal_list_key(key, app, action_tx),
        View::Journal => journal::handle_journal_key(key, app, action_tx),
        View::Catalog => catalog::handle_catalog_key(key, app, action_tx),
    }
}

fn handle_confirm_key(key: KeyEvent, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            enqueue_action(action_tx, Action::ResolveConfirm(Confirmation::Confirmed));
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            enqueue_action(action_tx, Action::ResolveConfirm(Confirmation::Declined));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ConfirmKind;
    use time::UtcOffset;

    use super::super::action_queue::channel;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn any_key_dismisses_an_alert() {
        let mut app = App::new("jdoe", UtcOffset::UTC);
        app.alert = Some("can't add a journal at this time".to_string());
        let (tx, mut rx) = channel();

        handle_key(press(KeyCode::Char('n')), &mut app, &tx);

        assert!(app.alert.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn confirm_prompt_answers_either_way() {
        let mut app = App::new("jdoe", UtcOffset::UTC);
        app.ask_confirm(ConfirmKind::CopyJournal, " Copy ", String::new());
        let (tx, mut rx) = channel();

        handle_key(press(KeyCode::Esc), &mut app, &tx);
        assert_eq!(
            rx.try_recv().ok(),
            Some(Action::ResolveConfirm(Confirmation::Declined))
        );

        handle_key(press(KeyCode::Char('y')), &mut app, &tx);
        assert_eq!(
            rx.try_recv().ok(),
            Some(Action::ResolveConfirm(Confirmation::Confirmed))
        );
    }
}
