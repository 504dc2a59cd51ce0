/// Basic unit tests to verify core functionality
use caveman_tracker::*;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn daily_habit(streak: u32, best: u32, last: Option<&str>) -> Habit {
    let mut habit = Habit::new(
        "Make Fire".to_string(),
        "Keep the cave warm".to_string(),
        Frequency::Daily,
        0,
        "Survival".to_string(),
    )
    .unwrap();
    habit.streak = streak;
    habit.best_streak = best;
    habit.last_completed = last.map(|s| s.parse().unwrap());
    habit
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            "Test Habit".to_string(),
            "A test habit".to_string(),
            Frequency::Weekly,
            0,
            "Health".to_string(),
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.last_completed, None);
        assert!(habit.is_active);
    }

    #[test]
    fn test_streak_reset_after_gap() {
        let habit = daily_habit(5, 5, Some("2024-01-01"));

        let completion = complete_habit(&habit, date(2024, 1, 5), StreakPolicy::Literal).unwrap();

        assert_eq!(completion.habit.streak, 1);
        assert_eq!(completion.habit.best_streak, 5);
        assert_eq!(completion.change, StreakChange::Reset);
    }

    #[test]
    fn test_streak_continuation() {
        let habit = daily_habit(5, 5, Some("2024-01-01"));

        let completion = complete_habit(&habit, date(2024, 1, 2), StreakPolicy::Literal).unwrap();

        assert_eq!(completion.habit.streak, 6);
        assert_eq!(completion.habit.best_streak, 6);
    }

    #[test]
    fn test_weekly_tolerance_window() {
        let mut habit = daily_habit(2, 2, Some("2024-01-01"));
        habit.frequency = Frequency::Weekly;

        let on_time = complete_habit(&habit, date(2024, 1, 8), StreakPolicy::Literal).unwrap();
        let too_late = complete_habit(&habit, date(2024, 1, 10), StreakPolicy::Literal).unwrap();

        assert_eq!(on_time.habit.streak, 3);
        assert_eq!(too_late.habit.streak, 1);
    }

    #[test]
    fn test_leap_day_is_consecutive() {
        let habit = daily_habit(1, 1, Some("2024-02-28"));

        let completion = complete_habit(&habit, date(2024, 2, 29), StreakPolicy::Literal).unwrap();

        assert_eq!(completion.habit.streak, 2);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = compute_dashboard_stats(&[], &[], date(2024, 1, 1));

        assert_eq!(stats.total_habits, 0);
        assert_eq!(stats.success_rate, 0);
        assert_eq!(stats.task_completion_rate, 0);
        assert_eq!(stats.longest_streak, 0);
    }

    #[test]
    fn test_invalid_state_is_refused() {
        let habit = daily_habit(4, 2, Some("2024-01-01"));

        let result = complete_habit(&habit, date(2024, 1, 2), StreakPolicy::Literal);

        assert!(matches!(result, Err(DomainError::InvalidState { .. })));
    }

    #[test]
    fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = TrackerServer::new(temp_file.path().to_path_buf(), Config::default(), true);
        assert!(server.is_ok());
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());

        // every storage interface is object safe
        let storage = storage.unwrap();
        let _: &dyn HabitStorage = &storage;
        let _: &dyn TaskStorage = &storage;
        let _: &dyn QuoteStorage = &storage;
    }
}
