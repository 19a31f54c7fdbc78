//! In-memory journal service for dev mode and tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    domain::{
        Exercise, ExerciseId, Journal, JournalEntry, JournalEntryId, JournalId, MuscleGroup,
        NewJournalEntry, Timestamp,
    },
    ApiError, JournalStore,
};

/// One method of [`JournalStore`], used to record and fail calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    CreateJournal,
    JournalsByAuthor,
    UpdateJournal,
    DeleteJournal,
    CreateEntry,
    EntriesForJournal,
    UpdateEntry,
    DeleteEntry,
    ListExercises,
    ExercisesForEntry,
    CreateExercise,
    UpdateExercise,
    FetchExercise,
}

impl StoreOp {
    pub fn call_name(&self) -> &'static str {
        match self {
            StoreOp::CreateJournal => "POST /journals",
            StoreOp::JournalsByAuthor => "GET /journals/authors/:author",
            StoreOp::UpdateJournal => "PUT /journals/:id",
            StoreOp::DeleteJournal => "DELETE /journals/:id",
            StoreOp::CreateEntry => "POST /entries",
            StoreOp::EntriesForJournal => "GET /journals/:id/entries",
            StoreOp::UpdateEntry => "PUT /entries/:id",
            StoreOp::DeleteEntry => "DELETE /entries/:id",
            StoreOp::ListExercises => "GET /exercises",
            StoreOp::ExercisesForEntry => "GET /entries/:id/exercises",
            StoreOp::CreateExercise => "POST /exercises",
            StoreOp::UpdateExercise => "PUT /exercises/:id",
            StoreOp::FetchExercise => "DELETE /exercises/:id",
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    journals: BTreeMap<JournalId, Journal>,
    entries: BTreeMap<JournalEntryId, JournalEntry>,
    exercises: BTreeMap<ExerciseId, Exercise>,
    calls: Vec<StoreOp>,
    failing: HashSet<StoreOp>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn begin(&mut self, op: StoreOp) -> Result<(), ApiError> {
        self.calls.push(op);
        if self.failing.contains(&op) {
            return Err(ApiError::Status {
                call: op.call_name().to_string(),
                status: 500,
            });
        }
        Ok(())
    }

    fn insert_journal(&mut self, author: &str, muscle_group: Option<MuscleGroup>) -> Journal {
        let journal = Journal {
            id: JournalId::new(self.next_id()),
            author: author.to_string(),
            muscle_group,
            entry_date: Timestamp::now().to_iso_string(),
            notes: None,
            journal_start: None,
            journal_finish: None,
        };
        self.journals.insert(journal.id, journal.clone());
        journal
    }

    fn insert_entry(&mut self, entry: &NewJournalEntry) -> Result<JournalEntry, ApiError> {
        if !self.journals.contains_key(&entry.journal_id) {
            return Err(ApiError::NotFound(format!("journal {}", entry.journal_id)));
        }
        let created = JournalEntry {
            id: JournalEntryId::new(self.next_id()),
            journal_id: entry.journal_id,
            exercises_finished: entry.exercises_finished.clone(),
        };
        self.entries.insert(created.id, created.clone());
        Ok(created)
    }

    fn insert_exercise(&mut self, exercise: &Exercise) -> Result<Exercise, ApiError> {
        if !self.entries.contains_key(&exercise.journal_entry_id) {
            return Err(ApiError::NotFound(format!(
                "entry {}",
                exercise.journal_entry_id
            )));
        }
        let id = ExerciseId::new(self.next_id());
        let created = Exercise {
            id: Some(id),
            ..exercise.clone()
        };
        self.exercises.insert(id, created.clone());
        Ok(created)
    }

    fn remove_entry(&mut self, id: JournalEntryId) -> Option<JournalEntry> {
        let removed = self.entries.remove(&id)?;
        self.exercises.retain(|_, e| e.journal_entry_id != id);
        Some(removed)
    }
}

/// A [`JournalStore`] holding everything in memory.
///
/// Mirrors what the client relies on from the real service: ids are
/// assigned on create, journals list newest first, entries and exercises
/// oldest first, and deletes cascade. Every call is recorded, and individual
/// operations can be made to fail.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every later call of `op` fail with a server error.
    pub fn fail_on(&self, op: StoreOp) {
        self.lock().failing.insert(op);
    }

    pub fn recover(&self, op: StoreOp) {
        self.lock().failing.remove(&op);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreOp> {
        self.lock().calls.clone()
    }

    pub fn count(&self, op: StoreOp) -> usize {
        self.lock().calls.iter().filter(|c| **c == op).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn journals(&self) -> Vec<Journal> {
        self.lock().journals.values().cloned().collect()
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        self.lock().entries.values().cloned().collect()
    }

    pub fn exercises(&self) -> Vec<Exercise> {
        self.lock().exercises.values().cloned().collect()
    }

    /// Insert a journal without recording a call.
    pub fn seed_journal(&self, author: &str, muscle_group: Option<MuscleGroup>) -> Journal {
        self.lock().insert_journal(author, muscle_group)
    }

    /// Replace a seeded journal wholesale, e.g. to set its start.
    pub fn seed_journal_update(&self, journal: Journal) {
        self.lock().journals.insert(journal.id, journal);
    }

    pub fn seed_entry(
        &self,
        journal_id: JournalId,
        exercises_finished: Vec<Timestamp>,
    ) -> Result<JournalEntry, ApiError> {
        self.lock().insert_entry(&NewJournalEntry {
            journal_id,
            exercises_finished,
        })
    }

    pub fn seed_exercise(&self, exercise: &Exercise) -> Result<Exercise, ApiError> {
        self.lock().insert_exercise(exercise)
    }
}

#[async_trait]
impl JournalStore for InMemoryStore {
    async fn create_journal(&self, author: &str) -> Result<Journal, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::CreateJournal)?;
        Ok(tables.insert_journal(author, None))
    }

    async fn journals_by_author(&self, author: &str) -> Result<Vec<Journal>, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::JournalsByAuthor)?;
        Ok(tables
            .journals
            .values()
            .rev()
            .filter(|j| j.author == author)
            .cloned()
            .collect())
    }

    async fn update_journal(&self, journal: &Journal) -> Result<Journal, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::UpdateJournal)?;
        let stored = tables
            .journals
            .get_mut(&journal.id)
            .ok_or_else(|| ApiError::NotFound(format!("journal {}", journal.id)))?;
        *stored = journal.clone();
        Ok(stored.clone())
    }

    async fn delete_journal(&self, id: JournalId) -> Result<String, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::DeleteJournal)?;
        tables
            .journals
            .remove(&id)
            .ok_or_else(|| ApiError::NotFound(format!("journal {}", id)))?;
        let entry_ids: Vec<JournalEntryId> = tables
            .entries
            .values()
            .filter(|e| e.journal_id == id)
            .map(|e| e.id)
            .collect();
        for entry_id in entry_ids {
            tables.remove_entry(entry_id);
        }
        Ok(format!("journal {} deleted", id))
    }

    async fn create_entry(&self, entry: &NewJournalEntry) -> Result<JournalEntry, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::CreateEntry)?;
        tables.insert_entry(entry)
    }

    async fn entries_for_journal(&self, id: JournalId) -> Result<Vec<JournalEntry>, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::EntriesForJournal)?;
        Ok(tables
            .entries
            .values()
            .filter(|e| e.journal_id == id)
            .cloned()
            .collect())
    }

    async fn update_entry(&self, entry: &JournalEntry) -> Result<JournalEntry, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::UpdateEntry)?;
        let stored = tables
            .entries
            .get_mut(&entry.id)
            .ok_or_else(|| ApiError::NotFound(format!("entry {}", entry.id)))?;
        *stored = entry.clone();
        Ok(stored.clone())
    }

    async fn delete_entry(&self, id: JournalEntryId) -> Result<JournalEntry, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::DeleteEntry)?;
        tables
            .remove_entry(id)
            .ok_or_else(|| ApiError::NotFound(format!("entry {}", id)))
    }

    async fn list_exercises(&self) -> Result<Vec<Exercise>, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::ListExercises)?;
        Ok(tables.exercises.values().cloned().collect())
    }

    async fn exercises_for_entry(&self, id: JournalEntryId) -> Result<Vec<Exercise>, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::ExercisesForEntry)?;
        Ok(tables
            .exercises
            .values()
            .filter(|e| e.journal_entry_id == id)
            .cloned()
            .collect())
    }

    async fn create_exercise(&self, exercise: &Exercise) -> Result<Exercise, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::CreateExercise)?;
        tables.insert_exercise(exercise)
    }

    async fn update_exercise(&self, exercise: &Exercise) -> Result<Exercise, ApiError> {
        let id = exercise.id.ok_or(ApiError::MissingId("exercise"))?;
        let mut tables = self.lock();
        tables.begin(StoreOp::UpdateExercise)?;
        let stored = tables
            .exercises
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("exercise {}", id)))?;
        *stored = exercise.clone();
        Ok(stored.clone())
    }

    async fn fetch_exercise(&self, id: ExerciseId) -> Result<Exercise, ApiError> {
        let mut tables = self.lock();
        tables.begin(StoreOp::FetchExercise)?;
        tables
            .exercises
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("exercise {}", id)))
    }
}
