/// Statistics assembly
///
/// Combines a habit's metadata, its completion days and the streak engine's
/// output into the statistics object returned to clients.

pub mod ledger;

pub use ledger::CompletionLedger;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{normalize, CompletionRatePolicy, FlatDailyRate, Habit, HabitId, StreakEngine};
use crate::service::{HabitService, ServiceError};
use crate::storage::Storage;

/// Derived view of one habit's completion history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_completions: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Percentage, 0.0 to 100.0
    pub completion_rate: f64,
    /// Every completion day, oldest first
    pub completions: Vec<NaiveDate>,
}

/// Builds `Statistics` from current store state
pub struct StatisticsAssembler {
    engine: StreakEngine<Box<dyn CompletionRatePolicy>>,
}

impl Default for StatisticsAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl StatisticsAssembler {
    pub fn new() -> Self {
        Self::with_rate_policy(FlatDailyRate)
    }

    pub fn with_rate_policy(policy: impl CompletionRatePolicy + 'static) -> Self {
        let policy: Box<dyn CompletionRatePolicy> = Box::new(policy);
        Self {
            engine: StreakEngine::with_rate_policy(policy),
        }
    }

    /// Statistics for `habit_id`; `NotFound` if the habit does not exist
    pub fn assemble<S: Storage>(
        &self,
        service: &HabitService<S>,
        habit_id: &HabitId,
    ) -> Result<Statistics, ServiceError> {
        let habit = service.get(habit_id)?;
        let days = service.ledger().days(habit_id)?;

        Ok(self.summarize(&habit, days, service.today()))
    }

    /// Statistics from already-fetched inputs
    pub fn summarize(&self, habit: &Habit, mut days: Vec<NaiveDate>, today: NaiveDate) -> Statistics {
        let summary = self.engine.calculate(
            &days,
            today,
            normalize(&habit.created_at),
            habit.frequency,
        );

        days.sort_unstable();

        Statistics {
            total_completions: days.len(),
            current_streak: summary.current_streak,
            longest_streak: summary.longest_streak,
            completion_rate: summary.completion_rate,
            completions: days,
        }
    }
}
