/// Calendar views over habits and tasks
///
/// A day collects the tasks due or finished on it and the active habits
/// last completed on it. Only the most recent completion of a habit is
/// stored, so earlier days of a streak show no habits.

use chrono::{Months, NaiveDate};
use serde::Serialize;

use crate::domain::{DomainError, Habit, Task};

/// Everything that happened, or is due, on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_today: bool,
    pub tasks: Vec<Task>,
    pub completed_habits: Vec<Habit>,
}

impl CalendarDay {
    pub fn has_events(&self) -> bool {
        !self.tasks.is_empty() || !self.completed_habits.is_empty()
    }
}

/// Build the view of `date` from full or pre-filtered collections
pub fn day_view(date: NaiveDate, habits: &[Habit], tasks: &[Task], today: NaiveDate) -> CalendarDay {
    CalendarDay {
        date,
        is_today: date == today,
        tasks: tasks
            .iter()
            .filter(|t| t.due_date == Some(date) || t.completed_on == Some(date))
            .cloned()
            .collect(),
        completed_habits: habits
            .iter()
            .filter(|h| h.is_active && h.is_completed_on(date))
            .cloned()
            .collect(),
    }
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), DomainError> {
    let invalid = || DomainError::InvalidDate(format!("{}-{:02} is not a calendar month", year, month));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;

    Ok((first, last))
}

/// One entry per day of the month, in order
pub fn month_view(
    year: i32,
    month: u32,
    habits: &[Habit],
    tasks: &[Task],
    today: NaiveDate,
) -> Result<Vec<CalendarDay>, DomainError> {
    let (first, last) = month_bounds(year, month)?;

    Ok(first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| day_view(day, habits, tasks, today))
        .collect())
}
