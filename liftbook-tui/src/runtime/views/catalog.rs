use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_catalog_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            let last = app.catalog.lines().len().saturating_sub(1);
            app.catalog_scroll = (app.catalog_scroll + 1).min(last);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.catalog_scroll = app.catalog_scroll.saturating_sub(1);
        }
        KeyCode::Char('r') => enqueue_action(action_tx, Action::LoadCatalog),
        KeyCode::Esc | KeyCode::Char('q') => app.navigate_to(View::Journals),
        _ => {}
    }
}
