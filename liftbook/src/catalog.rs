use tracing::instrument;

use crate::{domain::Exercise, JournalError, JournalStore, LoadState, Result, UserAction};

/// Every exercise the service knows about, across authors and journals.
#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
    load_state: LoadState,
}

impl ExerciseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[instrument(skip_all)]
    pub async fn load<S: JournalStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let result = store
            .list_exercises()
            .await
            .map_err(JournalError::action(UserAction::LoadCatalog));
        self.load_state.record(&result);
        self.exercises = result?;
        Ok(())
    }

    /// `description weight` per exercise, skipping rows with neither.
    pub fn lines(&self) -> Vec<String> {
        self.exercises
            .iter()
            .filter(|e| !e.exercise_description.is_empty() || !e.exercise_weight.is_empty())
            .map(|e| {
                format!("{} {}", e.exercise_description, e.exercise_weight)
                    .trim()
                    .to_string()
            })
            .collect()
    }
}
