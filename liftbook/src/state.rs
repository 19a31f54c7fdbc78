use crate::JournalError;

/// Answer to a destructive-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Confirmation::Confirmed)
    }
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// Outcome of the last read a container performed.
///
/// A failed read keeps the message so the view can offer a retry instead of
/// showing an empty list with no explanation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }

    pub(crate) fn record<T>(&mut self, result: &Result<T, JournalError>) {
        *self = match result {
            Ok(_) => LoadState::Loaded,
            Err(err) => LoadState::Failed(err.to_string()),
        };
    }
}
