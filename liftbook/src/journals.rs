use tracing::{debug, instrument};

use crate::{
    domain::{Journal, JournalId},
    Confirmation, JournalError, JournalStore, LoadState, Result, UserAction,
};

/// Author names this short or shorter are not looked up.
const MIN_LOAD_CHARS: usize = 3;
/// Shortest author name a journal can be created for.
const MIN_ADD_CHARS: usize = 3;

/// The journals of one author, newest first.
#[derive(Debug, Clone, Default)]
pub struct JournalList {
    author: String,
    journals: Vec<Journal>,
    load_state: LoadState,
}

impl JournalList {
    pub fn new(author: &str) -> Self {
        Self {
            author: author.trim().to_lowercase(),
            ..Self::default()
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Switch to another author. The current list belongs to the previous
    /// author, so it is dropped. Returns whether the author changed.
    pub fn set_author(&mut self, author: &str) -> bool {
        let author = author.trim().to_lowercase();
        if author == self.author {
            return false;
        }
        self.author = author;
        self.journals.clear();
        self.load_state = LoadState::NotLoaded;
        true
    }

    pub fn can_load(&self) -> bool {
        self.author.chars().count() > MIN_LOAD_CHARS
    }

    pub fn can_add(&self) -> bool {
        self.author.chars().count() >= MIN_ADD_CHARS
    }

    pub fn journals(&self) -> &[Journal] {
        &self.journals
    }

    pub fn get(&self, id: JournalId) -> Option<&Journal> {
        self.journals.iter().find(|j| j.id == id)
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Fetch the author's journals. Does nothing for too short an author and
    /// returns whether a fetch happened.
    #[instrument(skip(self, store), fields(author = %self.author))]
    pub async fn load<S: JournalStore + ?Sized>(&mut self, store: &S) -> Result<bool> {
        if !self.can_load() {
            debug!("author too short, not loading");
            return Ok(false);
        }
        let result = store
            .journals_by_author(&self.author)
            .await
            .map_err(JournalError::action(UserAction::LoadJournals));
        self.load_state.record(&result);
        self.journals = result?;
        Ok(true)
    }

    /// Create a journal for the author and put it on top of the list.
    #[instrument(skip(self, store), fields(author = %self.author))]
    pub async fn add<S: JournalStore + ?Sized>(&mut self, store: &S) -> Result<&Journal> {
        if !self.can_add() {
            return Err(JournalError::AuthorTooShort { min: MIN_ADD_CHARS });
        }
        let journal = store
            .create_journal(&self.author)
            .await
            .map_err(JournalError::action(UserAction::AddJournal))?;
        self.journals.insert(0, journal);
        Ok(&self.journals[0])
    }

    /// Delete a journal and drop it from the list. Returns `false` without
    /// calling the service when declined.
    #[instrument(skip(self, store))]
    pub async fn remove<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        id: JournalId,
        confirmation: Confirmation,
    ) -> Result<bool> {
        if !confirmation.is_confirmed() {
            return Ok(false);
        }
        store
            .delete_journal(id)
            .await
            .map_err(JournalError::action(UserAction::DeleteJournal))?;
        self.journals.retain(|j| j.id != id);
        Ok(true)
    }

    /// Persist a journal and reload the whole list.
    #[instrument(skip(self, store, journal), fields(journal_id = %journal.id))]
    pub async fn change<S: JournalStore + ?Sized>(
        &mut self,
        store: &S,
        journal: &Journal,
    ) -> Result<()> {
        store
            .update_journal(journal)
            .await
            .map_err(JournalError::action(UserAction::UpdateJournal))?;
        self.load(store).await?;
        Ok(())
    }
}
