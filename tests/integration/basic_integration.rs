/// Basic integration tests against on-disk databases
use caveman_tracker::tools;
use caveman_tracker::*;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_habit(storage: &SqliteStorage, name: &str) -> Habit {
    let habit = Habit::new(
        name.to_string(),
        String::new(),
        Frequency::Daily,
        0,
        "Survival".to_string(),
    )
    .unwrap();
    storage.create_habit(&habit).unwrap();
    habit
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[test]
    fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let habit_id = {
            let storage = SqliteStorage::new(db_path.clone()).expect("Failed to open database");
            let habit = new_habit(&storage, "Make Fire");
            tools::complete_habit(&storage, &habit.id, date(2024, 3, 1), StreakPolicy::Literal)
                .unwrap();
            tools::complete_habit(&storage, &habit.id, date(2024, 3, 2), StreakPolicy::Literal)
                .unwrap();
            habit.id
        };

        // reopening runs migrations again and must keep the data
        let storage = SqliteStorage::new(db_path).expect("Failed to reopen database");
        let habit = storage.get_habit(&habit_id).unwrap();

        assert_eq!(habit.streak, 2);
        assert_eq!(habit.best_streak, 2);
        assert_eq!(habit.last_completed, Some(date(2024, 3, 2)));
    }

    #[test]
    fn test_corrupt_row_is_reported_not_coerced() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();
        let storage = SqliteStorage::new(db_path.clone()).unwrap();
        let habit = new_habit(&storage, "Make Fire");

        // damage the row behind the storage layer's back
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute(
            "UPDATE habits SET streak = 9, best_streak = 2, last_completed = '2024-03-01' WHERE id = ?1",
            [habit.id.as_str()],
        )
        .unwrap();
        drop(conn);

        let err = tools::complete_habit(&storage, &habit.id, date(2024, 3, 2), StreakPolicy::Literal)
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_state");
        let stored = storage.get_habit(&habit.id).unwrap();
        assert_eq!(stored.streak, 9);
        assert_eq!(stored.last_completed, Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_concurrent_completions_apply_once() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf()).unwrap();
        let habit = new_habit(&storage, "Make Fire");
        let applied = AtomicUsize::new(0);
        let day = date(2024, 3, 1);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    let completion =
                        tools::complete_habit(&storage, &habit.id, day, StreakPolicy::Literal)
                            .unwrap();
                    if completion.applied {
                        applied.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        assert_eq!(applied.load(Ordering::SeqCst), 1);
        let stored = storage.get_habit(&habit.id).unwrap();
        assert_eq!(stored.streak, 1);
        assert_eq!(stored.best_streak, 1);
    }

    #[test]
    fn test_dashboard_over_stored_data() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let today = date(2024, 3, 10);

        let fire = new_habit(&storage, "Make Fire");
        let hunt = new_habit(&storage, "Hunt");
        new_habit(&storage, "Gather");
        tools::complete_habit(&storage, &fire.id, today, StreakPolicy::Literal).unwrap();
        tools::complete_habit(&storage, &hunt.id, date(2024, 3, 9), StreakPolicy::Literal).unwrap();
        tools::complete_habit(&storage, &hunt.id, today, StreakPolicy::Literal).unwrap();

        let mut roof = Task::new(
            "Fix roof".to_string(),
            String::new(),
            "Cave".to_string(),
            Priority::High,
            Some(date(2024, 3, 1)),
            0,
        )
        .unwrap();
        storage.create_task(&roof).unwrap();
        let spear = Task::new(
            "Sharpen spear".to_string(),
            String::new(),
            "Tools".to_string(),
            Priority::Low,
            Some(date(2024, 3, 5)),
            0,
        )
        .unwrap();
        storage.create_task(&spear).unwrap();
        roof.complete(today);
        storage.save_task(&roof).unwrap();

        let stats = tools::dashboard_stats(&storage, today).unwrap().stats;

        assert_eq!(stats.total_habits, 3);
        assert_eq!(stats.active_habit_count, 3);
        assert_eq!(stats.completed_today, 2);
        assert_eq!(stats.success_rate, 66);
        assert_eq!(stats.total_streak_count, 3);
        assert_eq!(stats.longest_streak, 2);
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_task_count, 1);
        assert_eq!(stats.active_task_count, 1);
        assert_eq!(stats.task_completion_rate, 50);
        assert_eq!(stats.overdue_task_count, 1);
    }

    #[test]
    fn test_config_file_selects_streak_policy() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            "[habits]\ncustom_interval_continuity = true\n[quotes]\nenabled = false\n",
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        let server = TrackerServer::new(dir.path().join("cave.db"), config, false).unwrap();

        assert_eq!(server.streak_policy(), StreakPolicy::IntervalAware);
        assert!(server.quote_source().is_none());
    }
}
