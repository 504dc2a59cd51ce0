/// Tools for the calendar views
///
/// This module implements the calendar_day and calendar_month MCP tools.

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calendar::{self, CalendarDay};
use crate::domain::{Habit, Task};
use crate::storage::{HabitFilter, HabitStorage, TaskFilter, TaskStorage};
use crate::ServerError;

/// Parameters for viewing one day
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CalendarDayParams {
    /// Day to show (YYYY-MM-DD); defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CalendarDayResponse {
    pub success: bool,
    pub day: CalendarDay,
    pub message: String,
}

/// Parameters for viewing a month
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CalendarMonthParams {
    /// Defaults to the current year
    pub year: Option<i32>,
    /// 1-12; defaults to the current month
    pub month: Option<u32>,
}

/// Per-day counts in a month view
#[derive(Debug, Serialize)]
pub struct MonthDaySummary {
    pub date: NaiveDate,
    pub is_today: bool,
    pub task_count: usize,
    pub completed_habit_count: usize,
}

#[derive(Debug, Serialize)]
pub struct CalendarMonthResponse {
    pub success: bool,
    pub year: i32,
    pub month: u32,
    pub days: Vec<MonthDaySummary>,
    pub message: String,
}

/// Load the habits and the tasks touching `from..=until`
fn load_range<S: HabitStorage + TaskStorage>(
    storage: &S,
    from: NaiveDate,
    until: NaiveDate,
) -> Result<(Vec<Habit>, Vec<Task>), ServerError> {
    let habits = storage.list_habits(&HabitFilter::active())?;
    let tasks = storage.list_tasks(&TaskFilter {
        include_completed: true,
        touching: Some((from, until)),
        ..Default::default()
    })?;
    Ok((habits, tasks))
}

pub fn calendar_day<S: HabitStorage + TaskStorage>(
    storage: &S,
    params: CalendarDayParams,
    today: NaiveDate,
) -> Result<CalendarDayResponse, ServerError> {
    let date = params.date.unwrap_or(today);
    let (habits, tasks) = load_range(storage, date, date)?;
    let day = calendar::day_view(date, &habits, &tasks, today);

    let message = if day.has_events() {
        format!(
            "🌙 {}: {} rocks, {} fires lit",
            date,
            day.tasks.len(),
            day.completed_habits.len()
        )
    } else {
        format!("🌙 {}: a quiet day in the cave", date)
    };

    Ok(CalendarDayResponse {
        success: true,
        day,
        message,
    })
}

pub fn calendar_month<S: HabitStorage + TaskStorage>(
    storage: &S,
    params: CalendarMonthParams,
    today: NaiveDate,
) -> Result<CalendarMonthResponse, ServerError> {
    let year = params.year.unwrap_or_else(|| today.year());
    let month = params.month.unwrap_or_else(|| today.month());
    let (first, last) = calendar::month_bounds(year, month)?;

    let (habits, tasks) = load_range(storage, first, last)?;
    let days: Vec<MonthDaySummary> = calendar::month_view(year, month, &habits, &tasks, today)?
        .into_iter()
        .map(|day| MonthDaySummary {
            date: day.date,
            is_today: day.is_today,
            task_count: day.tasks.len(),
            completed_habit_count: day.completed_habits.len(),
        })
        .collect();

    let busy = days
        .iter()
        .filter(|d| d.task_count > 0 || d.completed_habit_count > 0)
        .count();
    let message = format!("🌕 {}-{:02}: {} of {} days with events", year, month, busy, days.len());

    Ok(CalendarMonthResponse {
        success: true,
        year,
        month,
        days,
        message,
    })
}
