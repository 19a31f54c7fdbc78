use std::time::Instant;
use time::UtcOffset;
use tracing::{debug, info, instrument};

use crate::{
    debounce::{Debouncer, NOTES_QUIET_PERIOD},
    domain::{
        default_journal_entry, ExerciseField, Journal, JournalEntry, MuscleGroup, Timestamp,
    },
    timer::{self, Slot},
    Confirmation, ExerciseTable, JournalError, JournalStore, LoadState, Result, UserAction,
};

/// An entry of the open journal together with its exercise rows.
#[derive(Debug, Clone)]
pub struct EntryGroup {
    entry: JournalEntry,
    table: ExerciseTable,
}

impl EntryGroup {
    pub fn entry(&self) -> &JournalEntry {
        &self.entry
    }

    pub fn table(&self) -> &ExerciseTable {
        &self.table
    }

    pub fn max_sets(&self) -> usize {
        self.table.max_sets()
    }

    /// Every planned set round has a completion.
    pub fn is_done(&self) -> bool {
        self.entry.completed_sets() >= self.max_sets()
    }

    pub fn slots(&self, journal_start: Option<Timestamp>, offset: UtcOffset) -> Vec<Slot> {
        timer::completion_slots(&self.entry, journal_start, self.max_sets(), offset)
    }
}

/// One journal opened for logging: its entries, their exercise tables, and
/// the notes draft.
///
/// Progress of a journal is derived, never stored: it is started once
/// `journal_start` is set, and done once every entry with planned sets has a
/// completion for each of them.
#[derive(Debug, Clone)]
pub struct JournalEntries {
    journal: Journal,
    groups: Vec<EntryGroup>,
    notes: String,
    notes_debounce: Debouncer<String>,
    load_state: LoadState,
}

impl JournalEntries {
    pub fn new(journal: Journal) -> Self {
        let notes = journal.notes.clone().unwrap_or_default();
        Self {
            journal,
            groups: Vec::new(),
            notes,
            notes_debounce: Debouncer::new(NOTES_QUIET_PERIOD),
            load_state: LoadState::NotLoaded,
        }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn groups(&self) -> &[EntryGroup] {
        &self.groups
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Take a fresher copy of the journal, e.g. after the list reloaded.
    /// A notes draft that hasn't been sent yet is kept.
    pub fn sync_journal(&mut self, journal: Journal) {
        if journal.id != self.journal.id {
            return;
        }
        if !self.notes_debounce.is_pending() {
            self.notes = journal.notes.clone().unwrap_or_default();
        }
        self.journal = journal;
    }

    pub fn is_done(&self) -> bool {
        self.groups.iter().any(|g| g.max_sets() > 0)
            && self.groups.iter().all(EntryGroup::is_done)
    }

    fn group(&self, index: usize) -> Result<&EntryGroup> {
        self.groups.get(index).ok_or(JournalError::NoSuchEntry(index))
    }

    fn group_mut(&mut self, index: usize) -> Result<&mut EntryGroup> {
        self.groups
            .get_mut(index)
            .ok_or(JournalError::NoSuchEntry(index))
    }

    /// Fetch the entries and then each entry's exercises.
    #[instrument(skip_all, fields(journal_id = %self.journal.id))]
    pub async fn load<S: JournalStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let result = store
            .entries_for_journal(self.journal.id)
            .await
            .map_err(JournalError::action(UserAction::LoadEntries));
        self.load_state.record(&result);
        let entries = result?;

        let mut groups = Vec::with_capacity(entries.len());
        let mut first_error = None;
        for entry in entries {
            let mut table = ExerciseTable::new(entry.id);
            if let Err(err) = table.load(store).await {
                first_error.get_or_insert(err);
            }
            groups.push(EntryGroup { entry, table });
        }
        self.groups = groups;

        match first_error {
            Some(err) => {
                self.load_state = LoadState::Failed(err.to_string());
                Err(err)
            }
            None => Ok(()),
        }
    }

    async fn persist_journal<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        journal: Journal,
        action: UserAction,
    ) -> Result<()> {
        self.journal = store
            .update_journal(&journal)
            .await
            .map_err(JournalError::action(action))?;
        Ok(())
    }

    /// Stamp the journal start. Starting twice keeps the first start.
    #[instrument(skip_all, fields(journal_id = %self.journal.id))]
    pub async fn start<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        now: Timestamp,
    ) -> Result<()> {
        if self.journal.is_started() {
            return Ok(());
        }
        let journal = Journal {
            journal_start: Some(now),
            ..self.journal.clone()
        };
        self.persist_journal(store, journal, UserAction::StartJournal)
            .await
    }

    #[instrument(skip_all, fields(journal_id = %self.journal.id, %group))]
    pub async fn set_muscle_group<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        group: MuscleGroup,
    ) -> Result<()> {
        let journal = Journal {
            muscle_group: Some(group),
            ..self.journal.clone()
        };
        self.persist_journal(store, journal, UserAction::UpdateJournal)
            .await
    }

    /// Create an empty entry and append it.
    #[instrument(skip_all, fields(journal_id = %self.journal.id))]
    pub async fn add_entry<S: JournalStore + ?Sized>(&mut self, store: &S) -> Result<()> {
        let mut entry = store
            .create_entry(&default_journal_entry(self.journal.id))
            .await
            .map_err(JournalError::action(UserAction::AddEntry))?;
        entry.exercises_finished.clear();
        let table = ExerciseTable::empty(entry.id);
        self.groups.push(EntryGroup { entry, table });
        Ok(())
    }

    pub async fn add_exercise<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        entry_index: usize,
    ) -> Result<()> {
        self.group_mut(entry_index)?.table.add_row(store).await?;
        Ok(())
    }

    pub async fn edit_exercise<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        entry_index: usize,
        row: usize,
        field: ExerciseField,
        raw: &str,
    ) -> Result<()> {
        self.group_mut(entry_index)?
            .table
            .edit(store, row, field, raw)
            .await
    }

    /// Reload one entry's exercise rows.
    pub async fn reload_exercises<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        entry_index: usize,
    ) -> Result<()> {
        self.group_mut(entry_index)?.table.load(store).await
    }

    /// Finish set round `set_index` of an entry at `now`.
    ///
    /// Rounds are finished strictly in order. When this completes the last
    /// planned round across all entries, the journal finish is set to `now`.
    /// Returns whether the journal got finished by this call.
    #[instrument(skip_all, fields(journal_id = %self.journal.id, entry_index, set_index))]
    pub async fn complete_set<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        entry_index: usize,
        set_index: usize,
        now: Timestamp,
    ) -> Result<bool> {
        let group = self.group(entry_index)?;
        let max_sets = group.max_sets();
        let expected = group.entry.completed_sets();
        if set_index >= max_sets {
            return Err(JournalError::NoSuchSet {
                index: set_index,
                max_sets,
            });
        }
        if set_index != expected {
            return Err(JournalError::SetOutOfOrder {
                index: set_index,
                expected,
            });
        }

        let mut updated = group.entry.clone();
        updated.exercises_finished.push(now);
        let saved = store
            .update_entry(&updated)
            .await
            .map_err(JournalError::action(UserAction::ChangeEntry))?;
        self.groups[entry_index].entry = saved;

        if !self.is_done() {
            return Ok(false);
        }

        let journal = Journal {
            journal_finish: Some(now),
            ..self.journal.clone()
        };
        self.persist_journal(store, journal, UserAction::UpdateJournal)
            .await?;
        info!("journal finished");
        Ok(true)
    }

    /// Delete an entry and, server side, its exercises.
    /// Returns `false` without calling the service when declined.
    #[instrument(skip_all, fields(journal_id = %self.journal.id, entry_index))]
    pub async fn delete_entry<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        entry_index: usize,
        confirmation: Confirmation,
    ) -> Result<bool> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }
        let id = self.group(entry_index)?.entry.id;
        store
            .delete_entry(id)
            .await
            .map_err(JournalError::action(UserAction::DeleteEntry))?;
        self.groups.retain(|g| g.entry.id != id);
        Ok(true)
    }

    /// Update the notes draft; it is sent once edits pause.
    pub fn edit_notes(&mut self, notes: impl Into<String>, now: Instant) {
        self.notes = notes.into();
        self.notes_debounce.push(self.notes.clone(), now);
    }

    pub fn notes_pending(&self) -> bool {
        self.notes_debounce.is_pending()
    }

    pub fn notes_ready(&self, now: Instant) -> bool {
        self.notes_debounce.is_ready(now)
    }

    /// Send the notes draft if the quiet period has passed since the last
    /// edit. Returns whether an update was sent.
    pub async fn flush_notes<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        now: Instant,
    ) -> Result<bool> {
        let Some(notes) = self.notes_debounce.take_ready(now) else {
            return Ok(false);
        };
        self.save_notes(store, notes).await
    }

    /// Send the notes draft without waiting, e.g. when the journal is closed.
    pub async fn save_pending_notes<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<bool> {
        let Some(notes) = self.notes_debounce.flush() else {
            return Ok(false);
        };
        self.save_notes(store, notes).await
    }

    /// A draft that fails to send is held for the next flush, so closing the
    /// journal retries it and a sync does not overwrite it.
    async fn save_notes<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        notes: String,
    ) -> Result<bool> {
        let journal = Journal {
            notes: Some(notes.clone()),
            ..self.journal.clone()
        };
        if let Err(e) = self
            .persist_journal(store, journal, UserAction::SaveNotes)
            .await
        {
            self.notes_debounce.hold(notes);
            return Err(e);
        }
        Ok(true)
    }

    /// Create a new journal for today with the same author and muscle group,
    /// and copy every entry's exercises into fresh entries without ids or
    /// completions.
    ///
    /// Each step is its own request; a failure midway leaves the copy
    /// partially built.
    #[instrument(skip_all, fields(journal_id = %self.journal.id))]
    pub async fn copy_to_today<S: JournalStore + ?Sized>(
        &self,
        store: &S,
        confirmation: Confirmation,
    ) -> Result<Option<Journal>> {
        if !confirmation.is_confirmed() {
            return Ok(None);
        }
        let fail = |source| JournalError::Action {
            action: UserAction::CopyJournal,
            source,
        };

        let created = store
            .create_journal(&self.journal.author)
            .await
            .map_err(fail)?;
        let copy = store
            .update_journal(&Journal {
                muscle_group: self.journal.muscle_group,
                ..created
            })
            .await
            .map_err(fail)?;

        for group in &self.groups {
            let new_entry = store
                .create_entry(&default_journal_entry(copy.id))
                .await
                .map_err(fail)?;
            let exercises = store
                .exercises_for_entry(group.entry.id)
                .await
                .map_err(fail)?;
            for exercise in exercises {
                let created = store
                    .create_exercise(&exercise.duplicate_into(new_entry.id))
                    .await
                    .map_err(fail)?;
                debug!(exercise_id = ?created.id, "copied exercise");
            }
        }

        info!(copy_id = %copy.id, "journal copied");
        Ok(Some(copy))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        domain::{default_exercise, Exercise, JournalEntryId},
        InMemoryStore, StoreOp,
    };

    fn ts(raw: &str) -> Timestamp {
        Timestamp::parse(raw).unwrap()
    }

    fn planned(entry_id: JournalEntryId, description: &str, sets: i64) -> Exercise {
        Exercise {
            exercise_description: description.to_string(),
            exercise_weight: "60kg".to_string(),
            exercise_sets: sets,
            exercise_repetitions: 8,
            ..default_exercise(entry_id)
        }
    }

    /// A journal with one entry per element of `sets`, each holding a single
    /// exercise with that many planned sets.
    async fn open_journal(store: &InMemoryStore, sets: &[i64]) -> JournalEntries {
        let journal = store.seed_journal("jdoe", Some(MuscleGroup::Legs));
        for (i, count) in sets.iter().enumerate() {
            let entry = store.seed_entry(journal.id, vec![]).unwrap();
            store
                .seed_exercise(&planned(entry.id, &format!("lift {i}"), *count))
                .unwrap();
        }
        let mut entries = JournalEntries::new(journal);
        entries.load(store).await.unwrap();
        store.clear_calls();
        entries
    }

    #[tokio::test]
    async fn load_builds_one_group_per_entry() {
        let store = InMemoryStore::new();
        let entries = open_journal(&store, &[3, 2]).await;

        assert_eq!(entries.load_state(), &LoadState::Loaded);
        assert_eq!(entries.groups().len(), 2);
        assert_eq!(entries.groups()[0].max_sets(), 3);
        assert_eq!(entries.groups()[1].max_sets(), 2);
        assert!(!entries.is_done());
    }

    #[tokio::test]
    async fn failed_load_is_reported_for_retry() {
        let store = InMemoryStore::new();
        let journal = store.seed_journal("jdoe", None);
        store.fail_on(StoreOp::EntriesForJournal);

        let mut entries = JournalEntries::new(journal);
        let err = entries.load(&store).await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "can't load the exercise groups at this time"
        );
        assert!(entries.load_state().is_failed());

        store.recover(StoreOp::EntriesForJournal);
        entries.load(&store).await.unwrap();
        assert_eq!(entries.load_state(), &LoadState::Loaded);
    }

    #[tokio::test]
    async fn start_is_stamped_once() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[1]).await;
        let first = ts("2024-03-05T21:45:00.000Z");

        entries.start(&store, first).await.unwrap();
        entries
            .start(&store, ts("2024-03-05T22:00:00.000Z"))
            .await
            .unwrap();

        assert_eq!(entries.journal().journal_start, Some(first));
        assert_eq!(store.count(StoreOp::UpdateJournal), 1);
    }

    #[tokio::test]
    async fn finishing_every_set_finishes_the_journal() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[2]).await;
        let start = ts("2024-03-05T21:45:00.000Z");
        entries.start(&store, start).await.unwrap();

        let finished = entries
            .complete_set(&store, 0, 0, ts("2024-03-05T21:47:10.000Z"))
            .await
            .unwrap();
        assert!(!finished);
        assert!(entries.journal().journal_finish.is_none());

        let last = ts("2024-03-05T21:50:00.000Z");
        let finished = entries.complete_set(&store, 0, 1, last).await.unwrap();
        assert!(finished);
        assert!(entries.is_done());
        assert_eq!(entries.journal().journal_finish, Some(last));

        let slots = entries.groups()[0].slots(entries.journal().journal_start, UtcOffset::UTC);
        let labels: Vec<String> = slots
            .iter()
            .map(|slot| match slot {
                Slot::Completed { label, .. } => label.to_string(),
                Slot::Pending { .. } => "pending".to_string(),
            })
            .collect();
        assert_eq!(labels, vec!["21:47 +2", "21:50 +2"]);
    }

    #[tokio::test]
    async fn sets_are_finished_in_order() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[3]).await;
        let now = ts("2024-03-05T21:47:00.000Z");

        let err = entries.complete_set(&store, 0, 1, now).await.unwrap_err();
        assert_eq!(
            err,
            JournalError::SetOutOfOrder {
                index: 1,
                expected: 0
            }
        );

        let err = entries.complete_set(&store, 0, 3, now).await.unwrap_err();
        assert_eq!(
            err,
            JournalError::NoSuchSet {
                index: 3,
                max_sets: 3
            }
        );

        let err = entries.complete_set(&store, 4, 0, now).await.unwrap_err();
        assert_eq!(err, JournalError::NoSuchEntry(4));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_completion_keeps_local_entry() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[2]).await;
        store.fail_on(StoreOp::UpdateEntry);

        let err = entries
            .complete_set(&store, 0, 0, ts("2024-03-05T21:47:00.000Z"))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "can't change the exercise group at this time"
        );
        assert_eq!(entries.groups()[0].entry().completed_sets(), 0);
    }

    #[tokio::test]
    async fn new_entries_start_without_completions() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[]).await;

        entries.add_entry(&store).await.unwrap();
        entries.add_exercise(&store, 0).await.unwrap();
        entries
            .edit_exercise(&store, 0, 0, ExerciseField::Sets, "4")
            .await
            .unwrap();

        let group = &entries.groups()[0];
        assert!(group.entry().exercises_finished.is_empty());
        assert_eq!(group.table().load_state(), &LoadState::Loaded);
        assert_eq!(group.max_sets(), 4);
        assert_eq!(
            store.calls(),
            vec![
                StoreOp::CreateEntry,
                StoreOp::CreateExercise,
                StoreOp::UpdateExercise
            ]
        );
    }

    #[tokio::test]
    async fn declined_delete_makes_no_call() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[1, 1]).await;

        let deleted = entries
            .delete_entry(&store, 0, Confirmation::Declined)
            .await
            .unwrap();

        assert!(!deleted);
        assert!(store.calls().is_empty());
        assert_eq!(entries.groups().len(), 2);
    }

    #[tokio::test]
    async fn confirmed_delete_cascades_exercises() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[1, 1]).await;
        let kept = entries.groups()[1].entry().id;

        let deleted = entries
            .delete_entry(&store, 0, Confirmation::Confirmed)
            .await
            .unwrap();

        assert!(deleted);
        assert_eq!(entries.groups().len(), 1);
        assert_eq!(entries.groups()[0].entry().id, kept);
        assert_eq!(store.exercises().len(), 1);
    }

    #[tokio::test]
    async fn notes_are_sent_after_a_pause() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[1]).await;
        let t0 = Instant::now();

        entries.edit_notes("felt", t0);
        entries.edit_notes("felt strong", t0 + Duration::from_millis(150));

        let sent = entries
            .flush_notes(&store, t0 + Duration::from_millis(300))
            .await
            .unwrap();
        assert!(!sent);
        assert!(store.calls().is_empty());

        let sent = entries
            .flush_notes(&store, t0 + Duration::from_millis(350))
            .await
            .unwrap();
        assert!(sent);
        assert_eq!(store.calls(), vec![StoreOp::UpdateJournal]);
        assert_eq!(entries.journal().notes.as_deref(), Some("felt strong"));
        assert!(!entries.notes_pending());
    }

    #[tokio::test]
    async fn pending_notes_can_be_saved_early() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[1]).await;

        entries.edit_notes("short session", Instant::now());
        assert!(entries.save_pending_notes(&store).await.unwrap());
        assert!(!entries.save_pending_notes(&store).await.unwrap());
        assert_eq!(store.count(StoreOp::UpdateJournal), 1);
    }

    #[tokio::test]
    async fn failed_notes_save_keeps_the_draft() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[1]).await;
        let t0 = Instant::now();
        store.fail_on(StoreOp::UpdateJournal);

        entries.edit_notes("felt strong", t0);
        let err = entries
            .flush_notes(&store, t0 + Duration::from_millis(250))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "can't save the notes at this time");
        assert!(entries.notes_pending());
        assert!(!entries.notes_ready(t0 + Duration::from_secs(1)));

        let stale = entries.journal().clone();
        entries.sync_journal(stale);
        assert_eq!(entries.notes(), "felt strong");

        store.recover(StoreOp::UpdateJournal);
        assert!(entries.save_pending_notes(&store).await.unwrap());
        assert_eq!(store.journals()[0].notes.as_deref(), Some("felt strong"));
        assert!(!entries.notes_pending());
    }

    #[tokio::test]
    async fn sync_keeps_an_unsent_notes_draft() {
        let store = InMemoryStore::new();
        let mut entries = open_journal(&store, &[1]).await;
        let fresher = Journal {
            notes: Some("from server".to_string()),
            ..entries.journal().clone()
        };

        entries.edit_notes("typing", Instant::now());
        entries.sync_journal(fresher.clone());
        assert_eq!(entries.notes(), "typing");

        entries.save_pending_notes(&store).await.unwrap();
        entries.sync_journal(fresher);
        assert_eq!(entries.notes(), "from server");
    }

    #[tokio::test]
    async fn copy_to_today_duplicates_structure_only() {
        let store = InMemoryStore::new();
        let journal = store.seed_journal("jdoe", Some(MuscleGroup::Pull));
        for _ in 0..2 {
            let entry = store
                .seed_entry(journal.id, vec![ts("2024-03-05T21:47:00.000Z")])
                .unwrap();
            for j in 0..3 {
                store
                    .seed_exercise(&planned(entry.id, &format!("row {j}"), 3))
                    .unwrap();
            }
        }
        let mut entries = JournalEntries::new(journal.clone());
        entries.load(&store).await.unwrap();
        store.clear_calls();

        let copy = entries
            .copy_to_today(&store, Confirmation::Confirmed)
            .await
            .unwrap()
            .unwrap();

        assert_ne!(copy.id, journal.id);
        assert_eq!(copy.author, "jdoe");
        assert_eq!(copy.muscle_group, Some(MuscleGroup::Pull));
        assert_eq!(store.count(StoreOp::CreateJournal), 1);
        assert_eq!(store.count(StoreOp::CreateEntry), 2);
        assert_eq!(store.count(StoreOp::CreateExercise), 6);

        let copied: Vec<JournalEntry> = store
            .entries()
            .into_iter()
            .filter(|e| e.journal_id == copy.id)
            .collect();
        assert_eq!(copied.len(), 2);
        assert!(copied.iter().all(|e| e.exercises_finished.is_empty()));

        let originals: Vec<Exercise> = entries
            .groups()
            .iter()
            .flat_map(|g| g.table().rows().to_vec())
            .collect();
        let duplicates: Vec<Exercise> = store
            .exercises()
            .into_iter()
            .filter(|e| copied.iter().any(|c| c.id == e.journal_entry_id))
            .collect();
        assert_eq!(duplicates.len(), 6);
        assert!(duplicates
            .iter()
            .all(|d| originals.iter().all(|o| o.id != d.id)));
    }

    #[tokio::test]
    async fn declined_copy_makes_no_call() {
        let store = InMemoryStore::new();
        let entries = open_journal(&store, &[2]).await;

        let copy = entries
            .copy_to_today(&store, Confirmation::Declined)
            .await
            .unwrap();

        assert!(copy.is_none());
        assert!(store.calls().is_empty());
    }
}
