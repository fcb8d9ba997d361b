/// Completion entity for tracking habit check-ins
///
/// A Completion records that a habit was done on a given calendar day. The
/// day is stored already normalized; the time it was recorded is kept
/// separately in `created_at`.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, FixedOffset, NaiveDate};
use crate::domain::{normalize, CalendarDay, CompletionId, DomainError, HabitId};

const MAX_NOTES_LEN: usize = 500;

/// A record of completing a habit on a specific day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Unique identifier for this completion
    pub id: CompletionId,
    /// Which habit this completion is for
    pub habit_id: HabitId,
    /// Which day this completion was for
    pub completed_at: NaiveDate,
    /// User's notes about this completion
    pub notes: Option<String>,
    /// When this completion was recorded
    pub created_at: DateTime<FixedOffset>,
}

impl Completion {
    /// Create a new completion for the day `when` falls on
    pub fn new<T: CalendarDay + ?Sized>(
        habit_id: HabitId,
        when: &T,
        notes: Option<String>,
        now: DateTime<FixedOffset>,
    ) -> Result<Self, DomainError> {
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if let Some(text) = &notes {
            if text.chars().count() > MAX_NOTES_LEN {
                return Err(DomainError::Validation {
                    message: format!("notes cannot be longer than {} characters", MAX_NOTES_LEN),
                });
            }
        }

        Ok(Self {
            id: CompletionId::new(),
            habit_id,
            completed_at: normalize(when),
            notes,
            created_at: now,
        })
    }
}
