use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use liftbook::JournalStore;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};

use crate::app::App;
use crate::ui;

use super::action_queue::{channel, Action};
use super::actions::run_action;
use super::views::handle_key;

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    store: &dyn JournalStore,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let _ = action_tx.send(Action::LoadJournals);

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.is_loading {
            app.throbber_state.calc_next();
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, app, &action_tx);
                }
            }
        }

        // Notes go out once typing pauses.
        if app
            .open_journal
            .as_ref()
            .is_some_and(|j| j.notes_ready(Instant::now()))
        {
            let _ = action_tx.send(Action::FlushNotes);
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, store).await?;
        }

        if !app.running {
            break;
        }
    }

    if let Some(journal) = app.open_journal.as_mut() {
        if let Err(e) = journal.save_pending_notes(store).await {
            tracing::warn!(error = %e, "notes not saved on exit");
        }
    }

    Ok(())
}
