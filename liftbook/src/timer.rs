//! Set-completion timing labels.
//!
//! Each completed set round shows the local clock time it was finished at and
//! the minutes since the previous round (or since the journal start for the
//! first round).

use std::fmt;
use time::UtcOffset;

use crate::domain::{Exercise, JournalEntry, Timestamp};

const DAY_MS: i64 = 86_400_000;
const HOUR_MS: i64 = 3_600_000;
const MINUTE_MS: i64 = 60_000;

/// Minutes shown for an elapsed span.
///
/// The span is reduced modulo a day and then modulo an hour before flooring
/// to whole minutes. Spans are expected to be under a day, and existing
/// journals were labelled this way, so the reduction stays.
pub fn elapsed_minutes(elapsed_ms: i64) -> i64 {
    ((elapsed_ms % DAY_MS) % HOUR_MS).div_euclid(MINUTE_MS)
}

/// Number of completion slots an entry shows: the largest planned set count
/// among its exercises.
pub fn max_sets(exercises: &[Exercise]) -> usize {
    exercises
        .iter()
        .map(|e| usize::try_from(e.exercise_sets).unwrap_or(0))
        .max()
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionLabel {
    pub at: Timestamp,
    pub clock: String,
    /// `None` for the first round of a journal that was never started.
    pub elapsed_minutes: Option<i64>,
}

impl fmt::Display for CompletionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.elapsed_minutes {
            Some(minutes) => write!(f, "{} +{}", self.clock, minutes),
            None => f.write_str(&self.clock),
        }
    }
}

pub fn completion_labels(
    finished: &[Timestamp],
    journal_start: Option<Timestamp>,
    offset: UtcOffset,
) -> Vec<CompletionLabel> {
    finished
        .iter()
        .enumerate()
        .map(|(i, at)| {
            let previous = if i == 0 {
                journal_start
            } else {
                Some(finished[i - 1])
            };
            CompletionLabel {
                at: *at,
                clock: at.clock_at(offset),
                elapsed_minutes: previous.map(|p| elapsed_minutes(at.millis_since(p))),
            }
        })
        .collect()
}

/// One expected set round of an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Completed {
        index: usize,
        label: CompletionLabel,
    },
    /// `next` marks the only slot that can be finished now; rounds are
    /// finished in order.
    Pending { index: usize, next: bool },
}

impl Slot {
    pub fn index(&self) -> usize {
        match self {
            Slot::Completed { index, .. } | Slot::Pending { index, .. } => *index,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Slot::Completed { .. })
    }
}

pub fn completion_slots(
    entry: &JournalEntry,
    journal_start: Option<Timestamp>,
    max_sets: usize,
    offset: UtcOffset,
) -> Vec<Slot> {
    let mut labels = completion_labels(&entry.exercises_finished, journal_start, offset)
        .into_iter()
        .take(max_sets);
    let completed = entry.completed_sets();

    (0..max_sets)
        .map(|index| match labels.next() {
            Some(label) => Slot::Completed { index, label },
            None => Slot::Pending {
                index,
                next: index == completed,
            },
        })
        .collect()
}
