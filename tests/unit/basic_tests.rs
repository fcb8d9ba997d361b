/// Basic unit tests to verify core functionality
use chrono::{FixedOffset, NaiveDate, TimeZone};
use habit_tracker_api::*;

fn now() -> chrono::DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 1, 8, 30, 0)
        .unwrap()
}

#[test]
fn test_habit_creation_defaults() {
    let habit = Habit::new(
        NewHabit {
            name: "  Test Habit  ".to_string(),
            description: Some("A test habit".to_string()),
            ..NewHabit::default()
        },
        now(),
    )
    .expect("habit should be valid");

    assert_eq!(habit.name, "Test Habit");
    assert_eq!(habit.frequency, Frequency::Daily);
    assert_eq!(habit.color, DEFAULT_COLOR);
    assert_eq!(habit.created_at, habit.updated_at);
}

#[test]
fn test_habit_requires_name() {
    let result = Habit::new(NewHabit::default(), now());
    assert!(result.is_err());
}

#[test]
fn test_frequency_parsing() {
    assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
    assert_eq!("custom".parse::<Frequency>().unwrap(), Frequency::Custom);
    assert!("hourly".parse::<Frequency>().is_err());
}

#[test]
fn test_completion_uses_calendar_day_of_timestamp() {
    let late_evening = FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 1, 23, 45, 0)
        .unwrap();

    let completion = Completion::new(HabitId::new(), &late_evening, None, now()).unwrap();
    assert_eq!(completion.completed_at, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
}

#[test]
fn test_service_rejects_second_completion_same_day() {
    let clock = FixedClock::at_noon(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).unwrap();
    let service = HabitService::new(MemoryStorage::new(), clock, tracing::Span::none());
    let habit = service
        .create(NewHabit { name: "Floss".into(), ..NewHabit::default() })
        .unwrap();

    let morning = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(7, 0, 0).unwrap();
    let night = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(22, 0, 0).unwrap();

    service.mark_complete(&habit.id, &morning, None).unwrap();
    let err = service.mark_complete(&habit.id, &night, None).unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyCompleted { .. }));
}

#[test]
fn test_update_unknown_habit_is_not_found() {
    let service = HabitService::with_system_clock(MemoryStorage::new(), tracing::Span::none());
    let err = service
        .update(&HabitId::new(), HabitChanges { name: Some("x".into()), ..HabitChanges::default() })
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}
