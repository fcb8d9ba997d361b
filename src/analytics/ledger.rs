use chrono::NaiveDate;

use crate::domain::HabitId;
use crate::storage::{CompletionStore, StorageError};

/// Read-only view of the days a habit was completed
pub struct CompletionLedger<'a, S> {
    store: &'a S,
}

impl<'a, S: CompletionStore> CompletionLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Every recorded completion day, in no particular order
    pub fn days(&self, habit_id: &HabitId) -> Result<Vec<NaiveDate>, StorageError> {
        Ok(self
            .store
            .list_completions(habit_id)?
            .into_iter()
            .map(|completion| completion.completed_at)
            .collect())
    }
}
