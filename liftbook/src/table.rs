use tracing::{instrument, warn};

use crate::{
    domain::{default_exercise, Exercise, ExerciseField, JournalEntryId},
    timer, JournalError, JournalStore, LoadState, Result, UserAction,
};

/// The exercise rows of one entry, kept in step with the service.
///
/// Edits are applied locally first and then sent as the full merged row. The
/// server's answer replaces that one row; other rows only change on
/// [`ExerciseTable::load`].
#[derive(Debug, Clone)]
pub struct ExerciseTable {
    entry_id: JournalEntryId,
    rows: Vec<Exercise>,
    load_state: LoadState,
}

impl ExerciseTable {
    pub fn new(entry_id: JournalEntryId) -> Self {
        Self {
            entry_id,
            rows: Vec::new(),
            load_state: LoadState::NotLoaded,
        }
    }

    /// A table for an entry that was just created and can't have rows yet.
    pub(crate) fn empty(entry_id: JournalEntryId) -> Self {
        Self {
            load_state: LoadState::Loaded,
            ..Self::new(entry_id)
        }
    }

    pub fn entry_id(&self) -> JournalEntryId {
        self.entry_id
    }

    pub fn rows(&self) -> &[Exercise] {
        &self.rows
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn max_sets(&self) -> usize {
        timer::max_sets(&self.rows)
    }

    /// Replace all rows with the server's list for this entry.
    #[instrument(skip(self, store), fields(entry_id = %self.entry_id))]
    pub async fn load<S: JournalStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let result = store
            .exercises_for_entry(self.entry_id)
            .await
            .map_err(JournalError::action(UserAction::LoadExercises));
        self.load_state.record(&result);
        self.rows = result?;
        Ok(())
    }

    /// Set one cell and persist the row.
    ///
    /// If the update fails the table reloads from the server so the local
    /// rows don't keep a value the server never accepted, then returns the
    /// update error.
    #[instrument(skip(self, store, raw), fields(entry_id = %self.entry_id))]
    pub async fn edit<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        row: usize,
        field: ExerciseField,
        raw: &str,
    ) -> Result<()> {
        let exercise = self.rows.get_mut(row).ok_or(JournalError::NoSuchRow(row))?;
        field.apply(exercise, raw);
        let merged = exercise.clone();

        match store.update_exercise(&merged).await {
            Ok(saved) => {
                self.rows[row] = saved;
                Ok(())
            }
            Err(source) => {
                warn!(
                    row,
                    column = field.column(),
                    error = %source,
                    "exercise update failed, reloading"
                );
                if let Err(reload_err) = self.load(store).await {
                    warn!(error = %reload_err, "reload after failed update also failed");
                }
                Err(JournalError::Action {
                    action: UserAction::ChangeExercise,
                    source,
                })
            }
        }
    }

    /// Create a blank exercise on the server and append it.
    #[instrument(skip(self, store), fields(entry_id = %self.entry_id))]
    pub async fn add_row<S: JournalStore + ?Sized>(&mut self, store: &S) -> Result<&Exercise> {
        let created = store
            .create_exercise(&default_exercise(self.entry_id))
            .await
            .map_err(JournalError::action(UserAction::AddExercise))?;
        self.rows.push(created);
        Ok(&self.rows[self.rows.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryStore, StoreOp};

    async fn table_with_rows(store: &InMemoryStore, rows: usize) -> ExerciseTable {
        let journal = store.seed_journal("jdoe", None);
        let entry = store.seed_entry(journal.id, vec![]).unwrap();
        for _ in 0..rows {
            store.seed_exercise(&default_exercise(entry.id)).unwrap();
        }
        let mut table = ExerciseTable::new(entry.id);
        table.load(store).await.unwrap();
        table
    }

    #[tokio::test]
    async fn load_replaces_rows() {
        let store = InMemoryStore::new();
        let table = table_with_rows(&store, 2).await;
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.load_state(), &LoadState::Loaded);
    }

    #[tokio::test]
    async fn edit_persists_coerced_counts() {
        let store = InMemoryStore::new();
        let mut table = table_with_rows(&store, 1).await;

        table
            .edit(&store, 0, ExerciseField::Sets, "three")
            .await
            .unwrap();
        table
            .edit(&store, 0, ExerciseField::Repetitions, "10")
            .await
            .unwrap();

        let saved = &store.exercises()[0];
        assert_eq!(saved.exercise_sets, 0);
        assert_eq!(saved.exercise_repetitions, 10);
        assert_eq!(&table.rows()[0], saved);
    }

    #[tokio::test]
    async fn edit_only_touches_its_row() {
        let store = InMemoryStore::new();
        let mut table = table_with_rows(&store, 2).await;

        table
            .edit(&store, 1, ExerciseField::Description, "bench")
            .await
            .unwrap();

        assert_eq!(table.rows()[0].exercise_description, "");
        assert_eq!(table.rows()[1].exercise_description, "bench");
        assert_eq!(store.count(StoreOp::UpdateExercise), 1);
    }

    #[tokio::test]
    async fn failed_edit_reconciles_from_server() {
        let store = InMemoryStore::new();
        let mut table = table_with_rows(&store, 1).await;
        store.fail_on(StoreOp::UpdateExercise);

        let err = table
            .edit(&store, 0, ExerciseField::Weight, "225")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "can't change the exercise at this time");
        assert_eq!(table.rows()[0].exercise_weight, "");
        assert_eq!(store.count(StoreOp::ExercisesForEntry), 2);
    }

    #[tokio::test]
    async fn failed_edit_and_reload_keeps_local_value() {
        let store = InMemoryStore::new();
        let mut table = table_with_rows(&store, 1).await;
        store.fail_on(StoreOp::UpdateExercise);
        store.fail_on(StoreOp::ExercisesForEntry);

        assert!(table
            .edit(&store, 0, ExerciseField::Weight, "225")
            .await
            .is_err());

        assert_eq!(table.rows()[0].exercise_weight, "225");
        assert!(table.load_state().is_failed());
    }

    #[tokio::test]
    async fn edit_rejects_unknown_row() {
        let store = InMemoryStore::new();
        let mut table = table_with_rows(&store, 1).await;
        let err = table
            .edit(&store, 5, ExerciseField::Sets, "3")
            .await
            .unwrap_err();
        assert_eq!(err, JournalError::NoSuchRow(5));
        assert_eq!(store.count(StoreOp::UpdateExercise), 0);
    }

    #[tokio::test]
    async fn add_row_then_reload_has_exactly_one_more_default_row() {
        let store = InMemoryStore::new();
        let mut table = table_with_rows(&store, 2).await;
        let before = table.rows().to_vec();

        let added = table.add_row(&store).await.unwrap().clone();
        assert!(added.id.is_some());
        table.load(&store).await.unwrap();

        assert_eq!(table.rows().len(), before.len() + 1);
        assert!(before.iter().all(|row| table.rows().contains(row)));
        let new_rows: Vec<&Exercise> = table
            .rows()
            .iter()
            .filter(|row| !before.contains(row))
            .collect();
        assert_eq!(new_rows, vec![&added]);
        assert_eq!(added, Exercise { id: added.id, ..default_exercise(table.entry_id()) });
    }

    #[tokio::test]
    async fn failed_add_leaves_rows_alone() {
        let store = InMemoryStore::new();
        let mut table = table_with_rows(&store, 1).await;
        store.fail_on(StoreOp::CreateExercise);

        let err = table.add_row(&store).await.unwrap_err();

        assert_eq!(err.to_string(), "can't add exercises at this time");
        assert_eq!(table.rows().len(), 1);
    }

    #[tokio::test]
    async fn failed_load_is_recorded() {
        let store = InMemoryStore::new();
        store.fail_on(StoreOp::ExercisesForEntry);
        let mut table = ExerciseTable::new(JournalEntryId::new(1));

        assert!(table.load(&store).await.is_err());
        assert!(table.load_state().is_failed());
    }

    #[tokio::test]
    async fn max_sets_follows_edits() {
        let store = InMemoryStore::new();
        let mut table = table_with_rows(&store, 2).await;
        table.edit(&store, 0, ExerciseField::Sets, "3").await.unwrap();
        table.edit(&store, 1, ExerciseField::Sets, "5").await.unwrap();
        assert_eq!(table.max_sets(), 5);
    }
}
