/// Tool for the dashboard statistics
///
/// This module implements the dashboard_stats MCP tool.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::{compute_dashboard_stats, StatsSnapshot};
use crate::storage::{HabitFilter, HabitStorage, TaskFilter, TaskStorage};
use crate::ServerError;

/// Response carrying the statistics snapshot
#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub success: bool,
    pub stats: StatsSnapshot,
    pub message: String,
}

/// Compute dashboard figures from every stored habit and task
pub fn dashboard_stats<S: HabitStorage + TaskStorage>(
    storage: &S,
    today: NaiveDate,
) -> Result<DashboardStatsResponse, ServerError> {
    let habits = storage.list_habits(&HabitFilter::all())?;
    let tasks = storage.list_tasks(&TaskFilter {
        include_completed: true,
        ..Default::default()
    })?;

    let stats = compute_dashboard_stats(&habits, &tasks, today);

    let message = format!(
        "📊 {}/{} fires lit today ({}%), {} open rocks ({} overdue), longest streak {}",
        stats.completed_today,
        stats.total_habits,
        stats.success_rate,
        stats.active_task_count,
        stats.overdue_task_count,
        stats.longest_streak
    );

    Ok(DashboardStatsResponse {
        success: true,
        stats,
        message,
    })
}
