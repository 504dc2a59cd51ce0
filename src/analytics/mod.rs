/// Aggregate statistics over habits and tasks
///
/// Every snapshot is recomputed from the collections it is given. Nothing is
/// cached or maintained incrementally, so callers should pass a consistent
/// read of their data.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Habit, Task};

/// Point-in-time dashboard figures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatsSnapshot {
    pub total_habits: u32,
    pub active_habit_count: u32,
    /// Sum of current streaks across active habits
    pub total_streak_count: u32,
    /// Active habits whose last completion is today
    pub completed_today: u32,
    /// `completed_today * 100 / total_habits`, truncated
    pub success_rate: u32,
    /// Highest best streak across all habits
    pub longest_streak: u32,
    pub total_tasks: u32,
    pub active_task_count: u32,
    pub completed_task_count: u32,
    /// `completed_task_count * 100 / total_tasks`, truncated
    pub task_completion_rate: u32,
    pub overdue_task_count: u32,
}

/// Compute the dashboard snapshot for `today`
///
/// Empty collections are valid input and produce zeros everywhere.
pub fn compute_dashboard_stats(habits: &[Habit], tasks: &[Task], today: NaiveDate) -> StatsSnapshot {
    let total_habits = count(habits.len());
    let active: Vec<&Habit> = habits.iter().filter(|h| h.is_active).collect();

    let active_habit_count = count(active.len());
    let total_streak_count = active
        .iter()
        .fold(0u32, |sum, h| sum.saturating_add(h.streak));
    let completed_today = count(active.iter().filter(|h| h.is_completed_on(today)).count());
    let longest_streak = habits.iter().map(|h| h.best_streak).max().unwrap_or(0);

    let total_tasks = count(tasks.len());
    let completed_task_count = count(tasks.iter().filter(|t| t.is_completed).count());
    let active_task_count = total_tasks - completed_task_count;
    let overdue_task_count = count(tasks.iter().filter(|t| t.is_overdue(today)).count());

    StatsSnapshot {
        total_habits,
        active_habit_count,
        total_streak_count,
        completed_today,
        success_rate: percentage(completed_today, total_habits),
        longest_streak,
        total_tasks,
        active_task_count,
        completed_task_count,
        task_completion_rate: percentage(completed_task_count, total_tasks),
        overdue_task_count,
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Integer percentage truncated toward zero; 0 when `total` is 0
fn percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (u64::from(part) * 100 / u64::from(total)) as u32
}
