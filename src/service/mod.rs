/// Habit lifecycle service
///
/// The service sits between the HTTP layer and the stores: it validates
/// input, normalizes dates, and turns store outcomes into the error kinds
/// clients see.

pub mod lifecycle;

pub use lifecycle::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors surfaced by lifecycle and statistics operations
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(#[from] DomainError),

    #[error("habit not found: {habit_id}")]
    NotFound { habit_id: String },

    #[error("habit {habit_id} already completed on {day}")]
    AlreadyCompleted { habit_id: String, day: NaiveDate },

    #[error("no completion for habit {habit_id} on {day}")]
    CompletionNotFound { habit_id: String, day: NaiveDate },

    #[error("storage failure: {0}")]
    Store(#[source] StorageError),
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::HabitNotFound { habit_id } => ServiceError::NotFound { habit_id },
            StorageError::DuplicateCompletion { habit_id, day } => {
                ServiceError::AlreadyCompleted { habit_id, day }
            }
            StorageError::CompletionNotFound { habit_id, day } => {
                ServiceError::CompletionNotFound { habit_id, day }
            }
            other => ServiceError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_store_outcomes_are_translated() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(matches!(
            ServiceError::from(StorageError::HabitNotFound { habit_id: "x".into() }),
            ServiceError::NotFound { .. }
        ));
        assert!(matches!(
            ServiceError::from(StorageError::DuplicateCompletion { habit_id: "x".into(), day }),
            ServiceError::AlreadyCompleted { .. }
        ));
        assert!(matches!(
            ServiceError::from(StorageError::CompletionNotFound { habit_id: "x".into(), day }),
            ServiceError::CompletionNotFound { .. }
        ));
        assert!(matches!(
            ServiceError::from(StorageError::Connection("down".into())),
            ServiceError::Store(_)
        ));
    }
}
