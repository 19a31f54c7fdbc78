use serde::{Deserialize, Serialize};

use super::{timestamp, JournalEntryId, JournalId, Timestamp};

/// A grouping of exercises inside a journal, with one completion timestamp
/// appended per finished set round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub journal_id: JournalId,
    #[serde(default, deserialize_with = "timestamp::nullable_list")]
    pub exercises_finished: Vec<Timestamp>,
}

impl JournalEntry {
    pub fn completed_sets(&self) -> usize {
        self.exercises_finished.len()
    }
}

/// Payload for `POST /entries`; the server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJournalEntry {
    pub journal_id: JournalId,
    pub exercises_finished: Vec<Timestamp>,
}
