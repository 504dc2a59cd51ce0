/// Reminder timing and digest text
///
/// Only the pure parts live here: when the next morning or evening reminder is
/// due and what it should say. Delivering the reminder is up to the host.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

use crate::domain::{Habit, Task};

/// How many names a digest spells out before summarizing the rest
const DIGEST_NAME_LIMIT: usize = 3;

/// Delay from `now` until the next time the wall clock reads `at`
///
/// When `at` is not later than the current time of day, the next occurrence is
/// tomorrow.
pub fn next_fire_delay(now: NaiveDateTime, at: NaiveTime) -> TimeDelta {
    let today_at = now.date().and_time(at);
    let next = if today_at > now {
        today_at
    } else {
        now.date()
            .checked_add_days(Days::new(1))
            .map(|tomorrow| tomorrow.and_time(at))
            .unwrap_or(today_at)
    };
    next - now
}

/// The two daily reminder times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSchedule {
    pub morning: NaiveTime,
    pub evening: NaiveTime,
}

/// Delays until each reminder next fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextReminders {
    pub morning: TimeDelta,
    pub evening: TimeDelta,
}

impl ReminderSchedule {
    pub fn next_delays(&self, now: NaiveDateTime) -> NextReminders {
        NextReminders {
            morning: next_fire_delay(now, self.morning),
            evening: next_fire_delay(now, self.evening),
        }
    }
}

/// A ready-to-show reminder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digest {
    pub title: String,
    pub message: String,
    pub count: usize,
}

/// Reminder for active habits not yet completed on `today`
pub fn habit_digest(habits: &[Habit], today: NaiveDate) -> Option<Digest> {
    let pending: Vec<&str> = habits
        .iter()
        .filter(|h| h.is_active && !h.is_completed_on(today))
        .map(|h| h.name.as_str())
        .collect();

    match pending.len() {
        0 => None,
        1 => Some(Digest {
            title: "🔥 Keep Your Fire Burning!".to_string(),
            message: format!("Time to complete: {}", pending[0]),
            count: 1,
        }),
        n => Some(Digest {
            title: format!("🔥 {} Fires Need Attention", n),
            message: format!("Complete: {}", summarize(&pending)),
            count: n,
        }),
    }
}

/// Reminder for incomplete tasks due on `today`
pub fn task_digest(tasks: &[Task], today: NaiveDate) -> Option<Digest> {
    let pending: Vec<&str> = tasks
        .iter()
        .filter(|t| t.is_due_on(today))
        .map(|t| t.title.as_str())
        .collect();

    match pending.len() {
        0 => None,
        1 => Some(Digest {
            title: "🗿 Rock Needs Moving!".to_string(),
            message: format!("Task due today: {}", pending[0]),
            count: 1,
        }),
        n => Some(Digest {
            title: format!("🗿 {} Rocks Waiting", n),
            message: format!("Tasks due: {}", summarize(&pending)),
            count: n,
        }),
    }
}

fn summarize(names: &[&str]) -> String {
    let shown = names
        .iter()
        .take(DIGEST_NAME_LIMIT)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");

    if names.len() > DIGEST_NAME_LIMIT {
        format!("{} and {} more", shown, names.len() - DIGEST_NAME_LIMIT)
    } else {
        shown
    }
}
