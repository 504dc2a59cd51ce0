/// Streak continuity engine
///
/// Decides, for a habit and the calendar day a completion happens on, whether
/// the completion extends the streak, resets it, or is a no-op because the
/// habit was already completed that day. Pure: the caller loads the habit and
/// persists the returned value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Frequency, Habit};

/// How CUSTOM habits are judged for continuity
///
/// `Literal` treats CUSTOM exactly like DAILY (gap of one day). `IntervalAware`
/// requires the gap to equal the habit's own interval; it changes which
/// completions reset a streak and must be switched on explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakPolicy {
    #[default]
    Literal,
    IntervalAware,
}

/// What a completion did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakChange {
    /// First ever completion
    Started,
    /// Gap fell inside the frequency window
    Extended,
    /// Gap fell outside the window, streak restarts at 1
    Reset,
    /// Already completed on that day
    Unchanged,
}

/// Result of applying a completion to a habit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// False when the habit was already completed on the event date
    pub applied: bool,
    pub change: StreakChange,
    /// The habit after the completion (identical to the input when not applied)
    pub habit: Habit,
}

/// Whole calendar days from `from` to `to` (negative if `to` is earlier)
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Check whether a completion on `event_date` continues the streak
///
/// A habit that was never completed is never consecutive.
pub fn is_consecutive(
    frequency: Frequency,
    custom_interval: u32,
    last_completed: Option<NaiveDate>,
    event_date: NaiveDate,
    policy: StreakPolicy,
) -> bool {
    let Some(last) = last_completed else {
        return false;
    };
    let gap = days_between(last, event_date);

    match frequency {
        Frequency::Daily => gap == 1,
        Frequency::Weekly => (6..=8).contains(&gap),
        Frequency::Monthly => (28..=32).contains(&gap),
        Frequency::Custom => match policy {
            StreakPolicy::Literal => gap == 1,
            StreakPolicy::IntervalAware => gap == i64::from(custom_interval.max(1)),
        },
    }
}

/// Apply a completion on `event_date` to `habit`
///
/// Precondition: the habit is active. Callers filter inactive habits out;
/// this function does not re-check.
///
/// Returns `InvalidState` if the habit violates its streak invariants, so
/// corrupt data is reported instead of being silently coerced.
pub fn complete_habit(
    habit: &Habit,
    event_date: NaiveDate,
    policy: StreakPolicy,
) -> Result<Completion, DomainError> {
    habit.validate_invariants()?;

    if habit.is_completed_on(event_date) {
        return Ok(Completion {
            applied: false,
            change: StreakChange::Unchanged,
            habit: habit.clone(),
        });
    }

    let consecutive = is_consecutive(
        habit.frequency,
        habit.custom_interval,
        habit.last_completed,
        event_date,
        policy,
    );

    let (streak, change) = if consecutive {
        (habit.streak.saturating_add(1), StreakChange::Extended)
    } else if habit.last_completed.is_none() {
        (1, StreakChange::Started)
    } else {
        (1, StreakChange::Reset)
    };

    let mut updated = habit.clone();
    updated.streak = streak;
    updated.best_streak = habit.best_streak.max(streak);
    updated.last_completed = Some(event_date);

    tracing::debug!(
        "Habit {} completed on {}: streak {} -> {} ({:?})",
        habit.id,
        event_date,
        habit.streak,
        streak,
        change
    );

    Ok(Completion {
        applied: true,
        change,
        habit: updated,
    })
}

/// Encouragement line for a streak length
pub fn streak_message(streak: u32) -> String {
    match streak {
        0 => "No fire yet. Every great blaze starts with one spark.".to_string(),
        1 => "Spark lit! One day down, keep the fire fed.".to_string(),
        2..=6 => format!("Fire growing! {} in a row. Good cave person.", streak),
        7..=13 => format!("Strong fire! {} strong. Tribe notices.", streak),
        14..=29 => format!("Bonfire! {} straight. This is what chiefs do.", streak),
        30..=99 => format!("Eternal flame! {} of consistency.", streak),
        _ => format!("Legend of the cave! {} and still burning.", streak),
    }
}
