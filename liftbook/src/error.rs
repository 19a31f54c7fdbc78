use std::fmt;
use thiserror::Error;

/// Failure of a single round trip to the journal service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("TransportError: {0}")]
    Transport(String),
    #[error("{call} returned {status}")]
    Status { call: String, status: u16 },
    #[error("ParsingError: {0}")]
    Parsing(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0} has no id yet")]
    MissingId(&'static str),
}

/// The user-facing operation a failure is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    LoadJournals,
    AddJournal,
    DeleteJournal,
    UpdateJournal,
    StartJournal,
    SaveNotes,
    CopyJournal,
    LoadEntries,
    AddEntry,
    DeleteEntry,
    ChangeEntry,
    LoadExercises,
    AddExercise,
    ChangeExercise,
    LoadCatalog,
}

impl UserAction {
    pub fn describe(&self) -> &'static str {
        match self {
            UserAction::LoadJournals => "load your journals",
            UserAction::AddJournal => "add a journal",
            UserAction::DeleteJournal => "delete the journal",
            UserAction::UpdateJournal => "update the journal",
            UserAction::StartJournal => "start the journal",
            UserAction::SaveNotes => "save the notes",
            UserAction::CopyJournal => "copy the journal",
            UserAction::LoadEntries => "load the exercise groups",
            UserAction::AddEntry => "add the exercise group",
            UserAction::DeleteEntry => "delete the exercise group",
            UserAction::ChangeEntry => "change the exercise group",
            UserAction::LoadExercises => "load the exercises",
            UserAction::AddExercise => "add exercises",
            UserAction::ChangeExercise => "change the exercise",
            UserAction::LoadCatalog => "load the exercise catalog",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Errors surfaced by the journal containers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("can't {action} at this time")]
    Action {
        action: UserAction,
        #[source]
        source: ApiError,
    },
    #[error("set {index} can't be finished before set {expected}")]
    SetOutOfOrder { index: usize, expected: usize },
    #[error("set {index} is not planned (only {max_sets} sets)")]
    NoSuchSet { index: usize, max_sets: usize },
    #[error("no exercise group at position {0}")]
    NoSuchEntry(usize),
    #[error("no exercise at row {0}")]
    NoSuchRow(usize),
    #[error("author must be at least {min} characters")]
    AuthorTooShort { min: usize },
}

impl JournalError {
    pub fn action(action: UserAction) -> impl FnOnce(ApiError) -> Self {
        move |source| JournalError::Action { action, source }
    }
}

pub type Result<T, E = JournalError> = std::result::Result<T, E>;
