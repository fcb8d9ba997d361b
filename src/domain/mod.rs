/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, Completion), the calendar-day
/// normalization they rely on, and the streak engine that derives statistics
/// from a completion history.

pub mod habit;
pub mod completion;
pub mod day;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use completion::*;
pub use day::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
