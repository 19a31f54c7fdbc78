use crate::app::{App, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

mod catalog_view;
mod dialogs;
mod journal_list_view;
mod journal_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(frame.area());

    render_title_bar(frame, root[0], app);

    let body = root[1];
    match app.current_view {
        View::Journals => journal_list_view::render_journal_list(frame, app, body),
        View::Journal => journal_view::render_journal(frame, app, body),
        View::Catalog => catalog_view::render_catalog(frame, app, body),
    }

    if app.confirm.is_some() {
        dialogs::render_confirm_dialog(frame, app);
    }
    // Alerts sit above everything, including a pending confirmation.
    if app.alert.is_some() {
        dialogs::render_alert_dialog(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, area: Rect, app: &mut App) {
    const LABEL: &str = " Liftbook";
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2 + LABEL.len() as u16),
            Constraint::Min(10),
        ])
        .split(area);

    let throbber_area = Rect {
        x: cols[0].x + 1,
        y: cols[0].y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: cols[0].y,
        width: cols[0].width.saturating_sub(2),
        height: 1,
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .style(Style::default().fg(Color::Yellow))
        .throbber_style(Style::default().fg(Color::Yellow))
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(
            LABEL,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        label_area,
    );

    let muted = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(" | author: ", muted),
        Span::raw(if app.journals.author().is_empty() {
            "-".to_string()
        } else {
            app.journals.author().to_string()
        }),
    ];
    if let Some(status) = &app.status_message {
        spans.push(Span::styled(" | ", muted));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), cols[1]);
}
