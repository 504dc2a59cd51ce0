/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Habit};
use crate::storage::HabitStorage;
use crate::ServerError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Name of the habit (1-100 characters)
    pub name: String,
    pub description: Option<String>,
    /// daily, weekly, monthly or custom
    pub frequency: Frequency,
    /// Interval in days, required when frequency is custom
    pub custom_interval: Option<u32>,
    /// Free-form grouping such as "Health"
    pub category: Option<String>,
    /// Display color, e.g. "#FF6347"
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit: Habit,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ServerError> {
    let habit = Habit::new(
        params.name,
        params.description.unwrap_or_default(),
        params.frequency,
        params.custom_interval.unwrap_or(0),
        params.category.unwrap_or_default(),
    )?
    .with_appearance(params.color, params.icon);

    storage.create_habit(&habit)?;

    let message = format!(
        "🔥 Created habit '{}' ({}). Ready to start your streak!",
        habit.name,
        habit.frequency.display_name()
    );
    Ok(CreateHabitResponse {
        success: true,
        habit,
        message,
    })
}
