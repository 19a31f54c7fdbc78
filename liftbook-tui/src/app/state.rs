use liftbook::domain::{ExerciseField, JournalId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Journals,
    Journal,
    Catalog,
}

/// What a pending yes/no prompt will do once answered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfirmKind {
    DeleteJournal(JournalId),
    DeleteEntry(usize),
    CopyJournal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmContext {
    pub kind: ConfirmKind,
    pub title: &'static str,
    pub label: String,
}

/// Selected cell in the open journal: entry, exercise row and column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableCursor {
    pub entry: usize,
    pub row: usize,
    pub column: usize,
}

impl TableCursor {
    pub fn field(&self) -> ExerciseField {
        ExerciseField::ALL[self.column.min(ExerciseField::ALL.len() - 1)]
    }
}

/// An exercise cell being typed into.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    pub entry: usize,
    pub row: usize,
    pub field: ExerciseField,
    pub input: TextInput,
}

/// A text input with mid-string cursor support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// (before, after) the cursor.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        (&self.value[..self.cursor], &self.value[self.cursor..])
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        (0..pos)
            .rev()
            .find(|p| self.value.is_char_boundary(*p))
            .unwrap_or(0)
    }

    fn next_boundary(&self, pos: usize) -> usize {
        (pos + 1..=self.value.len())
            .find(|p| self.value.is_char_boundary(*p))
            .unwrap_or(self.value.len())
    }
}
