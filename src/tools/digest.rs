/// Tool for reminder digests
///
/// This module implements the reminder_digest MCP tool: what the morning and
/// evening reminders would say right now, and when they fire next.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::reminders::{habit_digest, task_digest, Digest, ReminderSchedule};
use crate::storage::{HabitFilter, HabitStorage, TaskFilter, TaskStorage};
use crate::ServerError;

/// Response carrying both digests
#[derive(Debug, Serialize)]
pub struct ReminderDigestResponse {
    pub success: bool,
    /// Absent when every active habit is done today
    pub habits: Option<Digest>,
    /// Absent when no open task is due today
    pub tasks: Option<Digest>,
    pub next_morning_in_minutes: i64,
    pub next_evening_in_minutes: i64,
    pub message: String,
}

pub fn reminder_digest<S: HabitStorage + TaskStorage>(
    storage: &S,
    schedule: &ReminderSchedule,
    now: NaiveDateTime,
) -> Result<ReminderDigestResponse, ServerError> {
    let today = now.date();
    let habits = storage.list_habits(&HabitFilter::active())?;
    let tasks = storage.list_tasks(&TaskFilter {
        due_on: Some(today),
        ..Default::default()
    })?;

    let habits = habit_digest(&habits, today);
    let tasks = task_digest(&tasks, today);
    let next = schedule.next_delays(now);

    let message = match (&habits, &tasks) {
        (None, None) => "All fires lit and rocks moved. Rest, cave person.".to_string(),
        _ => [&habits, &tasks]
            .into_iter()
            .flatten()
            .map(|d| format!("{}: {}", d.title, d.message))
            .collect::<Vec<_>>()
            .join("\n"),
    };

    Ok(ReminderDigestResponse {
        success: true,
        habits,
        tasks,
        next_morning_in_minutes: next.morning.num_minutes(),
        next_evening_in_minutes: next.evening.num_minutes(),
        message,
    })
}
