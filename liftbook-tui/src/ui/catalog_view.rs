use super::utils::key_hints;
use crate::app::App;
use liftbook::LoadState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph},
    Frame,
};

pub fn render_catalog(frame: &mut Frame, app: &App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(body);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Exercise Catalog ")
        .padding(Padding::horizontal(1));

    if let LoadState::Failed(err) = app.catalog.load_state() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{}. Press r to retry.", err),
                Style::default().fg(Color::DarkGray),
            ))
            .block(block),
            chunks[0],
        );
    } else {
        let items: Vec<ListItem> = app.catalog.lines().into_iter().map(ListItem::new).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(app.catalog_scroll));
        frame.render_stateful_widget(list, chunks[0], &mut state);
    }

    frame.render_widget(
        Paragraph::new(key_hints(&[("j/k", "Scroll"), ("r", "Reload"), ("Esc", "Back")])),
        chunks[1],
    );
}
