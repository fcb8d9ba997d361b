/// In-memory store
///
/// Honors the same contracts as the SQLite store (one completion per habit
/// and day, cascading deletes, newest-first ordering) without touching disk.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use crate::domain::{Completion, Habit, HabitId};
use crate::storage::{CompletionStore, HabitStore, StorageError};

#[derive(Default)]
struct Tables {
    /// Habit plus its insertion sequence, the tie-breaker for equal `created_at`
    habits: HashMap<HabitId, (u64, Habit)>,
    next_seq: u64,
    /// Completions per habit keyed by day, which is the uniqueness constraint
    completions: HashMap<HabitId, BTreeMap<NaiveDate, Completion>>,
}

#[derive(Default)]
pub struct MemoryStorage {
    tables: Mutex<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|_| StorageError::Connection("memory store mutex poisoned".to_string()))
    }
}

fn not_found(habit_id: &HabitId) -> StorageError {
    StorageError::HabitNotFound {
        habit_id: habit_id.to_string(),
    }
}

impl HabitStore for MemoryStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut tables = self.tables()?;
        if tables.habits.contains_key(&habit.id) {
            return Err(StorageError::Corrupt(format!("habit {} already exists", habit.id)));
        }
        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.habits.insert(habit.id.clone(), (seq, habit.clone()));
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        self.tables()?
            .habits
            .get(habit_id)
            .map(|(_, habit)| habit.clone())
            .ok_or_else(|| not_found(habit_id))
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut habits: Vec<(u64, Habit)> = self.tables()?.habits.values().cloned().collect();
        // Newest first, later inserts first on equal timestamps (rowid order in SQLite)
        habits.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at.cmp(&a.created_at).then(b_seq.cmp(a_seq))
        });
        Ok(habits.into_iter().map(|(_, habit)| habit).collect())
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let mut tables = self.tables()?;
        let (_, stored) = tables.habits.get_mut(&habit.id).ok_or_else(|| not_found(&habit.id))?;
        // created_at is write-once, as in the SQL store
        let created_at = stored.created_at;
        *stored = habit.clone();
        stored.created_at = created_at;
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let mut tables = self.tables()?;
        tables.habits.remove(habit_id).ok_or_else(|| not_found(habit_id))?;
        tables.completions.remove(habit_id);
        Ok(())
    }
}

impl CompletionStore for MemoryStorage {
    fn create_completion(&self, completion: &Completion) -> Result<(), StorageError> {
        let mut tables = self.tables()?;
        if !tables.habits.contains_key(&completion.habit_id) {
            return Err(not_found(&completion.habit_id));
        }

        let days = tables.completions.entry(completion.habit_id.clone()).or_default();
        if days.contains_key(&completion.completed_at) {
            return Err(StorageError::DuplicateCompletion {
                habit_id: completion.habit_id.to_string(),
                day: completion.completed_at,
            });
        }
        days.insert(completion.completed_at, completion.clone());
        Ok(())
    }

    fn delete_completion(&self, habit_id: &HabitId, day: NaiveDate) -> Result<(), StorageError> {
        self.tables()?
            .completions
            .get_mut(habit_id)
            .and_then(|days| days.remove(&day))
            .map(|_| ())
            .ok_or_else(|| StorageError::CompletionNotFound {
                habit_id: habit_id.to_string(),
                day,
            })
    }

    fn list_completions(&self, habit_id: &HabitId) -> Result<Vec<Completion>, StorageError> {
        Ok(self
            .tables()?
            .completions
            .get(habit_id)
            .map(|days| days.values().rev().cloned().collect())
            .unwrap_or_default())
    }
}
