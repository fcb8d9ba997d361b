/// Storage layer for persisting habit data
///
/// This module defines the store capabilities the service depends on and
/// provides two implementations: SQLite for the running server and an
/// in-memory store for tests and throwaway instances.

pub mod sqlite;
pub mod memory;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;
pub use memory::*;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{Completion, Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Completion not found: habit {habit_id} has no completion on {day}")]
    CompletionNotFound { habit_id: String, day: NaiveDate },

    #[error("Duplicate completion: habit {habit_id} already completed on {day}")]
    DuplicateCompletion { habit_id: String, day: NaiveDate },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Habit records by identifier
pub trait HabitStore {
    /// Insert a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// List every habit, newest first
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Overwrite an existing habit; `HabitNotFound` if nothing was written
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Remove a habit and every completion it owns
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;
}

/// Completion records keyed by (habit, day)
pub trait CompletionStore {
    /// Insert a completion
    ///
    /// Must reject a second completion for the same (habit, day) atomically
    /// with `DuplicateCompletion`, and a completion for an unknown habit with
    /// `HabitNotFound`.
    fn create_completion(&self, completion: &Completion) -> Result<(), StorageError>;

    /// Delete the completion of `habit_id` on `day`
    fn delete_completion(&self, habit_id: &HabitId, day: NaiveDate) -> Result<(), StorageError>;

    /// Completions of a habit ordered by day, newest first
    fn list_completions(&self, habit_id: &HabitId) -> Result<Vec<Completion>, StorageError>;
}

/// Everything the service needs from a backend
pub trait Storage: HabitStore + CompletionStore + Send + Sync + 'static {}

impl<T> Storage for T where T: HabitStore + CompletionStore + Send + Sync + 'static {}
