use super::{Exercise, JournalEntryId, JournalId, NewJournalEntry};

/// A new entry for `journal_id` with no completions yet.
pub fn default_journal_entry(journal_id: JournalId) -> NewJournalEntry {
    NewJournalEntry {
        journal_id,
        exercises_finished: Vec::new(),
    }
}

/// A blank exercise row for `entry_id`; the server assigns the id.
pub fn default_exercise(entry_id: JournalEntryId) -> Exercise {
    Exercise {
        id: None,
        journal_entry_id: entry_id,
        exercise_description: String::new(),
        exercise_weight: String::new(),
        exercise_sets: 0,
        exercise_repetitions: 0,
    }
}
