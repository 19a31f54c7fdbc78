use async_trait::async_trait;

use crate::{
    domain::{
        Exercise, ExerciseId, Journal, JournalEntry, JournalEntryId, JournalId, NewJournalEntry,
    },
    ApiError,
};

/// Port to the journal service.
///
/// One method per resource and verb. Implementations do no retrying or
/// caching: every call is a fresh round trip, and a failure is returned to
/// the caller as is.
#[async_trait]
pub trait JournalStore: Send + Sync {
    // ========================================================================
    // Journals
    // ========================================================================

    /// `POST /journals` with `{author}`.
    async fn create_journal(&self, author: &str) -> Result<Journal, ApiError>;

    /// `GET /journals/authors/{author}`.
    async fn journals_by_author(&self, author: &str) -> Result<Vec<Journal>, ApiError>;

    /// `PUT /journals/{id}` with the full journal.
    async fn update_journal(&self, journal: &Journal) -> Result<Journal, ApiError>;

    /// `DELETE /journals/{id}`. The server cascades to the journal's entries
    /// and answers with plain text.
    async fn delete_journal(&self, id: JournalId) -> Result<String, ApiError>;

    // ========================================================================
    // Entries
    // ========================================================================

    /// `POST /entries`.
    async fn create_entry(&self, entry: &NewJournalEntry) -> Result<JournalEntry, ApiError>;

    /// `GET /journals/{id}/entries`.
    async fn entries_for_journal(&self, id: JournalId) -> Result<Vec<JournalEntry>, ApiError>;

    /// `PUT /entries/{id}`.
    async fn update_entry(&self, entry: &JournalEntry) -> Result<JournalEntry, ApiError>;

    /// `DELETE /entries/{id}`, cascading to the entry's exercises.
    async fn delete_entry(&self, id: JournalEntryId) -> Result<JournalEntry, ApiError>;

    // ========================================================================
    // Exercises
    // ========================================================================

    /// `GET /exercises`: every exercise of every author.
    async fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError>;

    /// `GET /entries/{id}/exercises`.
    async fn exercises_for_entry(&self, id: JournalEntryId) -> Result<Vec<Exercise>, ApiError>;

    /// `POST /exercises`.
    async fn create_exercise(&self, exercise: &Exercise) -> Result<Exercise, ApiError>;

    /// `PUT /exercises/{id}`. Fails with [`ApiError::MissingId`] for a row the
    /// server has not assigned an id to.
    async fn update_exercise(&self, exercise: &Exercise) -> Result<Exercise, ApiError>;

    /// Fetch one exercise.
    ///
    /// The service exposes this as `DELETE /exercises/{id}`. The verb is kept
    /// for compatibility, but until the server's behavior is confirmed this
    /// must be treated as potentially destructive and is not used for reads
    /// anywhere in this crate.
    async fn fetch_exercise(&self, id: ExerciseId) -> Result<Exercise, ApiError>;
}
