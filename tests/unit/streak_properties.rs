/// Streak and completion-rate properties over a running service
use chrono::{Duration, NaiveDate};
use habit_tracker_api::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, 10).unwrap()
}

fn service() -> HabitService<MemoryStorage> {
    HabitService::new(MemoryStorage::new(), FixedClock::at_noon(today()).unwrap(), tracing::Span::none())
}

fn mark_days_ago(service: &HabitService<MemoryStorage>, habit_id: &HabitId, offsets: &[i64]) {
    for n in offsets {
        service.mark_complete(habit_id, &(today() - Duration::days(*n)), None).unwrap();
    }
}

fn new_habit(service: &HabitService<MemoryStorage>) -> Habit {
    service
        .create(NewHabit { name: "Push-ups".into(), ..NewHabit::default() })
        .unwrap()
}

#[test]
fn test_fresh_habit_has_empty_statistics() {
    let service = service();
    let habit = new_habit(&service);

    let stats = service.statistics(&habit.id).unwrap();
    assert_eq!(stats.total_completions, 0);
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 0);
    assert_eq!(stats.completion_rate, 0.0);
}

#[test]
fn test_current_streak_needs_today() {
    let service = service();
    let habit = new_habit(&service);
    mark_days_ago(&service, &habit.id, &[1, 2, 3]);

    let stats = service.statistics(&habit.id).unwrap();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 3);

    mark_days_ago(&service, &habit.id, &[0]);
    assert_eq!(service.statistics(&habit.id).unwrap().current_streak, 4);
}

#[test]
fn test_current_streak_never_exceeds_longest() {
    let service = service();
    let habit = new_habit(&service);
    mark_days_ago(&service, &habit.id, &[0, 1, 5, 6, 7, 8, 20]);

    let stats = service.statistics(&habit.id).unwrap();
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.longest_streak, 4);
    assert!(stats.current_streak <= stats.longest_streak);
    assert!(stats.longest_streak as usize <= stats.total_completions);
}

#[test]
fn test_rate_is_zero_on_creation_day() {
    let service = service();
    let habit = new_habit(&service);
    mark_days_ago(&service, &habit.id, &[0, 1]);

    // Created "now", so no whole day has elapsed
    assert_eq!(service.statistics(&habit.id).unwrap().completion_rate, 0.0);
}

#[test]
fn test_statistics_follow_unmark() {
    let service = service();
    let habit = new_habit(&service);
    mark_days_ago(&service, &habit.id, &[0, 1, 2]);

    service.unmark_complete(&habit.id, &(today() - Duration::days(1))).unwrap();

    let stats = service.statistics(&habit.id).unwrap();
    assert_eq!(stats.total_completions, 2);
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.longest_streak, 1);
}

#[test]
fn test_engine_rate_for_older_habit() {
    let summary = StreakEngine::new().calculate(
        &[today(), today() - Duration::days(1)],
        today(),
        today() - Duration::days(4),
        Frequency::Weekly,
    );

    assert_eq!(summary.completion_rate, 50.0);
    assert_eq!(summary.current_streak, 2);
}
