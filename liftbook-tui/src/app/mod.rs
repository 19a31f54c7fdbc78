use liftbook::{
    domain::{ExerciseField, Journal},
    ExerciseCatalog, JournalEntries, JournalError, JournalList,
};
use std::time::Instant;
use time::UtcOffset;

mod state;
pub use state::{CellEdit, ConfirmContext, ConfirmKind, TableCursor, TextInput, View};

pub struct App {
    pub running: bool,
    pub current_view: View,
    pub offset: UtcOffset,
    pub status_message: Option<String>,
    /// Blocking error shown until any key is pressed.
    pub alert: Option<String>,
    pub confirm: Option<ConfirmContext>,

    // Journal list
    pub journals: JournalList,
    pub selected_journal: usize,
    pub author_input: Option<TextInput>,

    // Open journal
    pub open_journal: Option<JournalEntries>,
    pub cursor: TableCursor,
    pub cell_edit: Option<CellEdit>,
    pub notes_input: Option<TextInput>,

    pub catalog: ExerciseCatalog,
    pub catalog_scroll: usize,

    pub is_loading: bool,
    pub throbber_state: throbber_widgets_tui::ThrobberState,
}

impl App {
    pub fn new(author: &str, offset: UtcOffset) -> Self {
        Self {
            running: true,
            current_view: View::Journals,
            offset,
            status_message: None,
            alert: None,
            confirm: None,
            journals: JournalList::new(author),
            selected_journal: 0,
            author_input: None,
            open_journal: None,
            cursor: TableCursor::default(),
            cell_edit: None,
            notes_input: None,
            catalog: ExerciseCatalog::new(),
            catalog_scroll: 0,
            is_loading: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn navigate_to(&mut self, view: View) {
        self.current_view = view;
        self.status_message = None;
    }

    pub fn show_error(&mut self, err: &JournalError) {
        self.alert = Some(err.to_string());
    }

    // Journal list

    pub fn selected_journal(&self) -> Option<&Journal> {
        self.journals.journals().get(self.selected_journal)
    }

    pub fn move_journal_selection(&mut self, down: bool) {
        let len = self.journals.journals().len();
        if len == 0 {
            self.selected_journal = 0;
            return;
        }
        self.selected_journal = if down {
            (self.selected_journal + 1).min(len - 1)
        } else {
            self.selected_journal.saturating_sub(1)
        };
    }

    pub fn clamp_journal_selection(&mut self) {
        let len = self.journals.journals().len();
        self.selected_journal = self.selected_journal.min(len.saturating_sub(1));
    }

    pub fn begin_author_edit(&mut self) {
        self.author_input = Some(TextInput::from_str(self.journals.author()));
    }

    pub fn ask_confirm(&mut self, kind: ConfirmKind, title: &'static str, label: String) {
        self.confirm = Some(ConfirmContext { kind, title, label });
    }

    // Open journal

    pub fn open(&mut self, entries: JournalEntries) {
        self.open_journal = Some(entries);
        self.cursor = TableCursor::default();
        self.cell_edit = None;
        self.notes_input = None;
        self.navigate_to(View::Journal);
    }

    fn entry_count(&self) -> usize {
        self.open_journal
            .as_ref()
            .map(|j| j.groups().len())
            .unwrap_or(0)
    }

    fn row_count(&self, entry: usize) -> usize {
        self.open_journal
            .as_ref()
            .and_then(|j| j.groups().get(entry))
            .map(|g| g.table().rows().len())
            .unwrap_or(0)
    }

    /// Keep the cursor inside the open journal after it changed shape.
    pub fn clamp_cursor(&mut self) {
        let entries = self.entry_count();
        self.cursor.entry = self.cursor.entry.min(entries.saturating_sub(1));
        let rows = self.row_count(self.cursor.entry);
        self.cursor.row = self.cursor.row.min(rows.saturating_sub(1));
    }

    pub fn move_entry(&mut self, next: bool) {
        let entries = self.entry_count();
        if entries == 0 {
            return;
        }
        self.cursor.entry = if next {
            (self.cursor.entry + 1).min(entries - 1)
        } else {
            self.cursor.entry.saturating_sub(1)
        };
        self.cursor.row = 0;
    }

    /// Move down through the rows, spilling into the next entry.
    pub fn move_row(&mut self, down: bool) {
        let rows = self.row_count(self.cursor.entry);
        if down {
            if self.cursor.row + 1 < rows {
                self.cursor.row += 1;
            } else if self.cursor.entry + 1 < self.entry_count() {
                self.cursor.entry += 1;
                self.cursor.row = 0;
            }
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
        } else if self.cursor.entry > 0 {
            self.cursor.entry -= 1;
            self.cursor.row = self.row_count(self.cursor.entry).saturating_sub(1);
        }
    }

    pub fn move_column(&mut self, right: bool) {
        let last = ExerciseField::ALL.len() - 1;
        self.cursor.column = if right {
            (self.cursor.column + 1).min(last)
        } else {
            self.cursor.column.saturating_sub(1)
        };
    }

    /// Start typing into the selected cell, seeded with its current text.
    pub fn begin_cell_edit(&mut self) -> bool {
        let cursor = self.cursor;
        let field = cursor.field();
        let Some(exercise) = self
            .open_journal
            .as_ref()
            .and_then(|j| j.groups().get(cursor.entry))
            .and_then(|g| g.table().rows().get(cursor.row))
        else {
            return false;
        };
        self.cell_edit = Some(CellEdit {
            entry: cursor.entry,
            row: cursor.row,
            field,
            input: TextInput::from_str(&field.display(exercise)),
        });
        true
    }

    pub fn begin_notes_edit(&mut self) {
        if let Some(journal) = &self.open_journal {
            self.notes_input = Some(TextInput::from_str(journal.notes()));
        }
    }

    /// Push the notes input into the open journal's debounced draft.
    pub fn sync_notes_draft(&mut self, now: Instant) {
        if let (Some(input), Some(journal)) = (&self.notes_input, self.open_journal.as_mut()) {
            journal.edit_notes(input.value.clone(), now);
        }
    }

    pub fn close_journal(&mut self) {
        self.open_journal = None;
        self.cell_edit = None;
        self.notes_input = None;
        self.navigate_to(View::Journals);
    }
}
