/// Tool for listing habits
///
/// This module implements the habit_list MCP tool.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{streak_message, Habit};
use crate::storage::{HabitFilter, HabitStorage};
use crate::ServerError;

/// Parameters for listing habits
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {
    /// Only habits in this category
    pub category: Option<String>,
    /// Show only active habits (default: true)
    pub active_only: Option<bool>,
}

/// A habit together with its state for today
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed_today: bool,
    pub streak_message: String,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub success: bool,
    pub habits: Vec<HabitSummary>,
    /// Categories of all active habits, for filtering
    pub categories: Vec<String>,
    pub message: String,
}

/// List habits with their streak state as of `today`
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
    today: NaiveDate,
) -> Result<ListHabitsResponse, ServerError> {
    let filter = HabitFilter {
        active_only: params.active_only.unwrap_or(true),
        category: params.category.filter(|c| !c.trim().is_empty()),
    };

    let habits: Vec<HabitSummary> = storage
        .list_habits(&filter)?
        .into_iter()
        .map(|habit| HabitSummary {
            completed_today: habit.is_completed_on(today),
            streak_message: streak_message(habit.streak),
            habit,
        })
        .collect();
    let categories = storage.habit_categories()?;

    let message = if habits.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let done = habits.iter().filter(|h| h.completed_today).count();
        format!("📋 {} habits, {} done today", habits.len(), done)
    };

    Ok(ListHabitsResponse {
        success: true,
        habits,
        categories,
        message,
    })
}
