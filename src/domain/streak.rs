/// Streak calculation over a completion history
///
/// The streak engine is a pure computation: given the set of completed days,
/// today's day and the day the habit was created, it derives the current
/// streak, the longest streak and the completion rate. It never fails; an
/// empty history produces all-zero results.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Frequency;

/// Streak-related results for one habit
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive completed days ending today (0 if today is not completed)
    pub current_streak: u32,
    /// Longest run of consecutive completed days ever observed
    pub longest_streak: u32,
    /// Completion percentage since creation, 0.0 to 100.0
    pub completion_rate: f64,
}

/// Formula turning a completion count into a completion percentage
///
/// Kept behind a trait so a frequency-aware formula can replace the flat one
/// without touching the engine's callers.
pub trait CompletionRatePolicy: Send + Sync {
    fn completion_rate(
        &self,
        total_completions: usize,
        days_since_creation: i64,
        frequency: Frequency,
    ) -> f64;
}

impl<P: CompletionRatePolicy + ?Sized> CompletionRatePolicy for Box<P> {
    fn completion_rate(
        &self,
        total_completions: usize,
        days_since_creation: i64,
        frequency: Frequency,
    ) -> f64 {
        (**self).completion_rate(total_completions, days_since_creation, frequency)
    }
}

/// Every habit is expected once per elapsed day, whatever its frequency
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatDailyRate;

impl CompletionRatePolicy for FlatDailyRate {
    fn completion_rate(
        &self,
        total_completions: usize,
        days_since_creation: i64,
        _frequency: Frequency,
    ) -> f64 {
        if days_since_creation <= 0 {
            return 0.0;
        }

        let rate = total_completions as f64 / days_since_creation as f64 * 100.0;
        rate.min(100.0)
    }
}

/// Computes streak summaries with a pluggable completion-rate formula
#[derive(Debug, Clone, Default)]
pub struct StreakEngine<R = FlatDailyRate> {
    rate_policy: R,
}

impl StreakEngine<FlatDailyRate> {
    pub fn new() -> Self {
        Self { rate_policy: FlatDailyRate }
    }
}

impl<R: CompletionRatePolicy> StreakEngine<R> {
    pub fn with_rate_policy(rate_policy: R) -> Self {
        Self { rate_policy }
    }

    /// Calculate streaks and completion rate
    ///
    /// `completed_days` may be in any order; each entry counts as one
    /// completion towards the rate.
    pub fn calculate(
        &self,
        completed_days: &[NaiveDate],
        today: NaiveDate,
        habit_created_day: NaiveDate,
        frequency: Frequency,
    ) -> StreakSummary {
        if completed_days.is_empty() {
            return StreakSummary::default();
        }

        let day_set: HashSet<NaiveDate> = completed_days.iter().copied().collect();
        let days_since_creation = (today - habit_created_day).num_days();

        StreakSummary {
            current_streak: current_streak(&day_set, today),
            longest_streak: longest_streak(completed_days),
            completion_rate: self.rate_policy.completion_rate(
                completed_days.len(),
                days_since_creation,
                frequency,
            ),
        }
    }
}

/// Walk backwards from `today`, counting days present in `days`
///
/// The walk is anchored to today, not to the latest completion: a habit done
/// yesterday but not yet today has a current streak of 0.
pub fn current_streak(days: &HashSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut checking = Some(today);

    while let Some(day) = checking {
        if !days.contains(&day) {
            break;
        }
        streak += 1;
        checking = day.pred_opt();
    }

    streak
}

/// Longest run of days each exactly one day after the previous
pub fn longest_streak(days: &[NaiveDate]) -> u32 {
    let mut sorted = days.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let Some(first) = sorted.first() else {
        return 0;
    };

    let mut longest = 1;
    let mut run = 1;
    let mut previous = *first;

    for day in sorted.iter().skip(1) {
        if (*day - previous).num_days() == 1 {
            run += 1;
        } else {
            longest = longest.max(run);
            run = 1;
        }
        previous = *day;
    }

    // Don't forget the last run
    longest.max(run)
}
