use super::utils::key_hints;
use crate::app::App;
use liftbook::{domain::Journal, LoadState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};
use time::UtcOffset;

pub fn render_journal_list(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(body);

    render_author(frame, app, chunks[0]);
    render_journals(frame, app, chunks[1]);
    frame.render_widget(
        Paragraph::new(key_hints(&[
            ("Enter", "Open"),
            ("n", "New"),
            ("d", "Delete"),
            ("m", "Muscle group"),
            ("a", "Author"),
            ("c", "Catalog"),
            ("r", "Reload"),
            ("q", "Quit"),
        ])),
        chunks[2],
    );
}

fn render_author(frame: &mut Frame, app: &App, area: Rect) {
    let (line, border) = match &app.author_input {
        Some(input) => {
            let (before, after) = input.split_at_cursor();
            (
                Line::from(vec![
                    Span::raw(before.to_string()),
                    Span::styled("█", Style::default().fg(Color::Yellow)),
                    Span::raw(after.to_string()),
                ]),
                Style::default().fg(Color::Yellow),
            )
        }
        None => (
            Line::from(app.journals.author().to_string()),
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Author ")
                .padding(Padding::horizontal(1)),
        ),
        area,
    );
}

fn journal_line(journal: &Journal, offset: UtcOffset) -> Line<'static> {
    let group = journal
        .muscle_group
        .map(|g| g.label())
        .unwrap_or("No group");
    let (state, color) = if journal.is_finished() {
        ("done", Color::Green)
    } else if journal.is_started() {
        ("in progress", Color::Yellow)
    } else {
        ("planned", Color::DarkGray)
    };
    Line::from(vec![
        Span::styled(journal.title(offset), Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled(format!("{:<8}", group), Style::default().fg(Color::Cyan)),
        Span::styled(state, Style::default().fg(color)),
    ])
}

fn render_journals(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Journals ")
        .padding(Padding::horizontal(1));

    let message = match app.journals.load_state() {
        LoadState::Failed(err) => Some(format!("{}. Press r to retry.", err)),
        _ if !app.journals.can_load() => {
            Some("Set an author longer than three characters with a.".to_string())
        }
        LoadState::Loaded if app.journals.journals().is_empty() => {
            Some("No journals yet. Press n to add one.".to_string())
        }
        _ => None,
    };
    if let Some(message) = message {
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(Color::DarkGray)))
                .block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .journals
        .journals()
        .iter()
        .map(|j| ListItem::new(journal_line(j, app.offset)))
        .collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(app.selected_journal));
    frame.render_stateful_widget(list, area, &mut state);
}
