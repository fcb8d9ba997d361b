/// Server bootstrap and persistence tests
use std::time::Duration;

use habit_tracker_api::*;
use tempfile::tempdir;

fn config_for(path: std::path::PathBuf) -> ServerConfig {
    ServerConfig {
        database: path,
        addr: "127.0.0.1:0".parse().unwrap(),
        request_timeout: Duration::from_secs(5),
    }
}

#[test]
fn test_server_opens_fresh_database() {
    let dir = tempdir().expect("Failed to create temp dir");
    let server = HabitTrackerServer::new(config_for(dir.path().join("habits.db")))
        .expect("Failed to create server");

    assert!(server.service().list().unwrap().is_empty());
}

#[test]
fn test_data_survives_restart() {
    let dir = tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("habits.db");

    let habit_id = {
        let server = HabitTrackerServer::new(config_for(db_path.clone())).expect("Failed to create first server");
        let habit = server
            .service()
            .create(NewHabit {
                name: "Meditate".to_string(),
                category: Some("mind".to_string()),
                ..NewHabit::default()
            })
            .unwrap();
        let today = server.service().today();
        server.service().mark_complete(&habit.id, &today, Some("ten minutes".to_string())).unwrap();
        habit.id
    };

    let server = HabitTrackerServer::new(config_for(db_path)).expect("Failed to create second server");
    let habit = server.service().get(&habit_id).unwrap();
    assert_eq!(habit.name, "Meditate");
    assert_eq!(habit.category.as_deref(), Some("mind"));

    let completions = server.service().list_completions(&habit_id).unwrap();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].notes.as_deref(), Some("ten minutes"));

    let stats = server.service().statistics(&habit_id).unwrap();
    assert_eq!(stats.total_completions, 1);
    assert_eq!(stats.current_streak, 1);
}

#[test]
fn test_sqlite_and_memory_stores_agree() {
    fn exercise<S: Storage>(store: S) -> (Vec<String>, Vec<String>, bool, usize) {
        let clock = FixedClock::at_noon(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()).unwrap();
        let service = HabitService::new(store, clock, tracing::Span::none());

        // Every habit shares the clock's timestamp, so ordering falls to insertion
        let first = service.create(NewHabit { name: "First".into(), ..NewHabit::default() }).unwrap();
        for name in ["Second", "Third", "Fourth"] {
            service.create(NewHabit { name: name.into(), ..NewHabit::default() }).unwrap();
        }
        let names = |service: &HabitService<S>| -> Vec<String> {
            service.list().unwrap().into_iter().map(|h| h.name).collect()
        };
        let before = names(&service);

        let today = service.today();
        service.mark_complete(&first.id, &today, None).unwrap();
        let duplicate = matches!(
            service.mark_complete(&first.id, &today, None),
            Err(ServiceError::AlreadyCompleted { .. })
        );

        service.delete(&first.id).unwrap();
        let orphaned = service.list_completions(&first.id).unwrap().len();

        (before, names(&service), duplicate, orphaned)
    }

    let dir = tempdir().unwrap();
    let sqlite = exercise(SqliteStorage::new(dir.path().join("agree.db")).unwrap());

    // Several runs so HashMap iteration order cannot line up by luck
    for _ in 0..10 {
        assert_eq!(exercise(MemoryStorage::new()), sqlite);
    }

    let (before, after, duplicate, orphaned) = sqlite;
    assert_eq!(before, ["Fourth", "Third", "Second", "First"]);
    assert_eq!(after, ["Fourth", "Third", "Second"]);
    assert!(duplicate);
    assert_eq!(orphaned, 0);
}
