use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::Span;

use crate::analytics::{CompletionLedger, Statistics, StatisticsAssembler};
use crate::domain::{
    normalize, CalendarDay, Clock, Completion, Habit, HabitChanges, HabitId, NewHabit, SystemClock,
};
use crate::service::ServiceError;
use crate::storage::Storage;

/// Create, read, update and delete habits and their daily completions
///
/// The service is stateless between calls: every operation reads fresh
/// state from the store. Log events are emitted under the span handed in at
/// construction.
pub struct HabitService<S> {
    store: S,
    clock: Box<dyn Clock>,
    assembler: StatisticsAssembler,
    span: Span,
}

impl<S: Storage> HabitService<S> {
    pub fn new(store: S, clock: impl Clock + 'static, span: Span) -> Self {
        Self {
            store,
            clock: Box::new(clock),
            assembler: StatisticsAssembler::new(),
            span,
        }
    }

    /// A service reading the system clock
    pub fn with_system_clock(store: S, span: Span) -> Self {
        Self::new(store, SystemClock, span)
    }

    /// The current calendar day
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now().fixed_offset()
    }

    /// Read access to a habit's recorded completion days
    pub fn ledger(&self) -> CompletionLedger<'_, S> {
        CompletionLedger::new(&self.store)
    }

    /// Create a habit; fails with `Validation` when the name is empty
    pub fn create(&self, input: NewHabit) -> Result<Habit, ServiceError> {
        let habit = Habit::new(input, self.now())?;
        self.store.create_habit(&habit)?;

        tracing::info!(parent: &self.span, habit_id = %habit.id, name = %habit.name, "created habit");
        Ok(habit)
    }

    pub fn get(&self, habit_id: &HabitId) -> Result<Habit, ServiceError> {
        Ok(self.store.get_habit(habit_id)?)
    }

    pub fn list(&self) -> Result<Vec<Habit>, ServiceError> {
        Ok(self.store.list_habits()?)
    }

    /// Apply a partial update to an existing habit
    pub fn update(&self, habit_id: &HabitId, changes: HabitChanges) -> Result<(), ServiceError> {
        let mut habit = self.store.get_habit(habit_id)?;
        habit.apply(changes, self.now())?;
        self.store.update_habit(&habit)?;

        tracing::info!(parent: &self.span, habit_id = %habit_id, "updated habit");
        Ok(())
    }

    /// Delete a habit together with all of its completions
    pub fn delete(&self, habit_id: &HabitId) -> Result<(), ServiceError> {
        self.store.delete_habit(habit_id)?;

        tracing::info!(parent: &self.span, habit_id = %habit_id, "deleted habit");
        Ok(())
    }

    /// Record that a habit was done on the day `when` falls on
    ///
    /// A second completion for the same day is rejected by the store's
    /// uniqueness constraint and reported as `AlreadyCompleted`.
    pub fn mark_complete<T: CalendarDay + ?Sized>(
        &self,
        habit_id: &HabitId,
        when: &T,
        notes: Option<String>,
    ) -> Result<Completion, ServiceError> {
        self.store.get_habit(habit_id)?;

        let completion = Completion::new(habit_id.clone(), when, notes, self.now())?;
        if let Err(err) = self.store.create_completion(&completion) {
            let err = ServiceError::from(err);
            if let ServiceError::AlreadyCompleted { .. } = err {
                tracing::debug!(parent: &self.span, habit_id = %habit_id, day = %completion.completed_at, "duplicate completion rejected");
            }
            return Err(err);
        }

        tracing::info!(parent: &self.span, habit_id = %habit_id, day = %completion.completed_at, "marked habit complete");
        Ok(completion)
    }

    /// Remove the completion recorded for the day `when` falls on
    pub fn unmark_complete<T: CalendarDay + ?Sized>(
        &self,
        habit_id: &HabitId,
        when: &T,
    ) -> Result<(), ServiceError> {
        let day = normalize(when);
        self.store.delete_completion(habit_id, day)?;

        tracing::info!(parent: &self.span, habit_id = %habit_id, day = %day, "removed completion");
        Ok(())
    }

    /// Completions of a habit, newest day first
    pub fn list_completions(&self, habit_id: &HabitId) -> Result<Vec<Completion>, ServiceError> {
        Ok(self.store.list_completions(habit_id)?)
    }

    /// Derived statistics for a habit, recomputed from current store state
    pub fn statistics(&self, habit_id: &HabitId) -> Result<Statistics, ServiceError> {
        let statistics = self.assembler.assemble(self, habit_id)?;

        tracing::debug!(
            parent: &self.span,
            habit_id = %habit_id,
            current_streak = statistics.current_streak,
            longest_streak = statistics.longest_streak,
            "computed statistics"
        );
        Ok(statistics)
    }
}
