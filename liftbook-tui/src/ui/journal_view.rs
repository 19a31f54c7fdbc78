use super::utils::key_hints;
use crate::app::{App, CellEdit};
use liftbook::{
    domain::ExerciseField,
    timer::Slot,
    EntryGroup, JournalEntries, LoadState,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Padding, Paragraph, Row, Table, Wrap},
    Frame,
};

const NOTES_HEIGHT: u16 = 5;

pub fn render_journal(frame: &mut Frame, app: &App, body: Rect) {
    let Some(journal) = &app.open_journal else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(NOTES_HEIGHT),
            Constraint::Length(1),
        ])
        .split(body);

    render_header(frame, app, journal, chunks[0]);
    render_groups(frame, app, journal, chunks[1]);
    render_notes(frame, app, journal, chunks[2]);

    let hints = if app.cell_edit.is_some() {
        key_hints(&[("Enter", "Save"), ("Esc", "Cancel")])
    } else if app.notes_input.is_some() {
        key_hints(&[("Esc", "Done")])
    } else {
        key_hints(&[
            ("s", "Start"),
            ("m", "Group"),
            ("g", "Add group"),
            ("e", "Add exercise"),
            ("f", "Finish set"),
            ("x", "Delete group"),
            ("Enter", "Edit"),
            ("o", "Notes"),
            ("c", "Copy"),
            ("Esc", "Back"),
        ])
    };
    frame.render_widget(Paragraph::new(hints), chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, entries: &JournalEntries, area: Rect) {
    let journal = entries.journal();
    let group = journal
        .muscle_group
        .map(|g| g.label())
        .unwrap_or("No group");
    let (state, color) = if journal.is_finished() {
        ("Done", Color::Green)
    } else if journal.is_started() {
        ("In progress", Color::Yellow)
    } else {
        ("Not started, press s", Color::DarkGray)
    };
    let line = Line::from(vec![
        Span::styled(
            journal.title(app.offset),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(group, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(state, Style::default().fg(color)),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::horizontal(1)),
        ),
        area,
    );
}

fn group_height(group: &EntryGroup) -> u16 {
    // borders + header + slot line
    group.table().rows().len().max(1) as u16 + 4
}

fn render_groups(frame: &mut Frame, app: &App, entries: &JournalEntries, area: Rect) {
    if let LoadState::Failed(err) = entries.load_state() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!("{}. Press r to retry.", err),
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }
    let groups = entries.groups();
    if groups.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No exercise groups yet. Press g to add one.",
                Style::default().fg(Color::DarkGray),
            )),
            area,
        );
        return;
    }

    // Scroll so the selected group is visible.
    let selected = app.cursor.entry.min(groups.len() - 1);
    let mut first = 0;
    while first < selected
        && groups[first..=selected]
            .iter()
            .map(group_height)
            .sum::<u16>()
            > area.height
    {
        first += 1;
    }

    let mut y = area.y;
    for (index, group) in groups.iter().enumerate().skip(first) {
        let height = group_height(group);
        if y >= area.bottom() {
            break;
        }
        let rect = Rect {
            x: area.x,
            y,
            width: area.width,
            height: height.min(area.bottom() - y),
        };
        render_group(frame, app, entries, index, group, rect);
        y += height;
    }
}

fn render_group(
    frame: &mut Frame,
    app: &App,
    entries: &JournalEntries,
    index: usize,
    group: &EntryGroup,
    area: Rect,
) {
    let focused = index == app.cursor.entry;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(format!(" Group {} ", index + 1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let header = Row::new(
        ExerciseField::ALL
            .iter()
            .map(|f| Cell::from(f.header()))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().fg(Color::Yellow));

    let rows: Vec<Row> = group
        .table()
        .rows()
        .iter()
        .enumerate()
        .map(|(row, exercise)| {
            Row::new(
                ExerciseField::ALL
                    .iter()
                    .enumerate()
                    .map(|(column, field)| {
                        let selected =
                            focused && row == app.cursor.row && column == app.cursor.column;
                        match app.cell_edit.as_ref() {
                            Some(edit) if is_edited(edit, index, row, *field) => edit_cell(edit),
                            _ => {
                                let style = if selected {
                                    Style::default().add_modifier(Modifier::REVERSED)
                                } else {
                                    Style::default()
                                };
                                Cell::from(field.display(exercise)).style(style)
                            }
                        }
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header);
    frame.render_widget(table, parts[0]);

    let slots = group.slots(entries.journal().journal_start, app.offset);
    frame.render_widget(Paragraph::new(slot_line(&slots)), parts[1]);
}

fn is_edited(edit: &CellEdit, entry: usize, row: usize, field: ExerciseField) -> bool {
    edit.entry == entry && edit.row == row && edit.field == field
}

fn edit_cell(edit: &CellEdit) -> Cell<'static> {
    let (before, after) = edit.input.split_at_cursor();
    Cell::from(Line::from(vec![
        Span::raw(before.to_string()),
        Span::styled("█", Style::default().fg(Color::Yellow)),
        Span::raw(after.to_string()),
    ]))
}

fn slot_line(slots: &[Slot]) -> Line<'static> {
    let mut spans = vec![Span::styled("Sets ", Style::default().fg(Color::DarkGray))];
    for slot in slots {
        let span = match slot {
            Slot::Completed { label, .. } => {
                Span::styled(format!("[{}]", label), Style::default().fg(Color::Green))
            }
            Slot::Pending { index, next: true } => Span::styled(
                format!("[ {} f ]", index + 1),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Slot::Pending { index, .. } => Span::styled(
                format!("[ {} ]", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
        };
        spans.push(span);
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

fn render_notes(frame: &mut Frame, app: &App, entries: &JournalEntries, area: Rect) {
    let (text, border) = match &app.notes_input {
        Some(input) => {
            let (before, after) = input.split_at_cursor();
            (
                format!("{}█{}", before, after),
                Style::default().fg(Color::Yellow),
            )
        }
        None => (entries.notes().to_string(), Style::default().fg(Color::DarkGray)),
    };
    let title = if entries.notes_pending() {
        " Notes (saving…) "
    } else {
        " Notes "
    };
    frame.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(title)
                    .padding(Padding::horizontal(1)),
            ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftbook::{domain::Timestamp, timer::CompletionLabel};

    #[test]
    fn slot_line_marks_the_next_set() {
        let slots = vec![
            Slot::Completed {
                index: 0,
                label: CompletionLabel {
                    at: Timestamp::parse("2024-03-05T21:47:00.000Z").unwrap(),
                    clock: "21:47".to_string(),
                    elapsed_minutes: Some(2),
                },
            },
            Slot::Pending {
                index: 1,
                next: true,
            },
            Slot::Pending {
                index: 2,
                next: false,
            },
        ];

        let text: String = slot_line(&slots)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();

        assert_eq!(text, "Sets [21:47 +2] [ 2 f ] [ 3 ] ");
    }
}
