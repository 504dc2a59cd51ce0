/// Property tests for the streak engine
use caveman_tracker::*;
use chrono::{NaiveDate, TimeDelta};
use proptest::prelude::*;

fn frequency_strategy() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
        Just(Frequency::Custom),
    ]
}

fn policy_strategy() -> impl Strategy<Value = StreakPolicy> {
    prop_oneof![Just(StreakPolicy::Literal), Just(StreakPolicy::IntervalAware)]
}

fn fresh_habit(frequency: Frequency, interval: u32) -> Habit {
    Habit::new(
        "Make Fire".to_string(),
        String::new(),
        frequency,
        interval,
        "Survival".to_string(),
    )
    .unwrap()
}

fn start_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

proptest! {
    #[test]
    fn best_streak_never_decreases(
        frequency in frequency_strategy(),
        interval in 1u32..30,
        policy in policy_strategy(),
        // negative steps model completions logged for an earlier day
        steps in prop::collection::vec(-3i64..40, 1..40),
    ) {
        let mut habit = fresh_habit(frequency, interval);
        let mut day = start_day();

        for step in steps {
            day += TimeDelta::days(step);
            let before = habit.best_streak;

            let completion = complete_habit(&habit, day, policy).unwrap();

            prop_assert!(completion.habit.best_streak >= before);
            prop_assert!(completion.habit.best_streak >= completion.habit.streak);
            prop_assert!(completion.habit.streak >= 1);
            prop_assert_eq!(completion.habit.last_completed, Some(day));
            prop_assert!(completion.habit.validate_invariants().is_ok());
            habit = completion.habit;
        }
    }

    #[test]
    fn completing_twice_is_idempotent(
        frequency in frequency_strategy(),
        interval in 1u32..30,
        policy in policy_strategy(),
        history in prop::collection::vec(1i64..35, 0..10),
        final_step in 0i64..35,
    ) {
        let mut habit = fresh_habit(frequency, interval);
        let mut day = start_day();
        for step in history {
            habit = complete_habit(&habit, day, policy).unwrap().habit;
            day += TimeDelta::days(step);
        }
        day += TimeDelta::days(final_step);

        let first = complete_habit(&habit, day, policy).unwrap();
        let second = complete_habit(&first.habit, day, policy).unwrap();

        prop_assert!(!second.applied);
        prop_assert_eq!(second.change, StreakChange::Unchanged);
        prop_assert_eq!(second.habit, first.habit);
    }

    #[test]
    fn first_completion_always_starts_at_one(
        frequency in frequency_strategy(),
        interval in 1u32..30,
        policy in policy_strategy(),
        offset in 0i64..3650,
    ) {
        let habit = fresh_habit(frequency, interval);
        let day = start_day() + TimeDelta::days(offset);

        let completion = complete_habit(&habit, day, policy).unwrap();

        prop_assert!(completion.applied);
        prop_assert_eq!(completion.change, StreakChange::Started);
        prop_assert_eq!(completion.habit.streak, 1);
        prop_assert_eq!(completion.habit.best_streak, 1);
    }

    #[test]
    fn daily_run_of_consecutive_days_counts_each_day(days in 1u32..60) {
        let mut habit = fresh_habit(Frequency::Daily, 0);
        let mut day = start_day();

        for _ in 0..days {
            habit = complete_habit(&habit, day, StreakPolicy::Literal).unwrap().habit;
            day += TimeDelta::days(1);
        }

        prop_assert_eq!(habit.streak, days);
        prop_assert_eq!(habit.best_streak, days);
    }
}
