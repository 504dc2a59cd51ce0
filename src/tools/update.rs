/// Tools for editing and removing habits
///
/// This module implements the habit_update and habit_delete MCP tools.
/// Edits never touch streak fields; only completions move a streak.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Habit, HabitChanges, HabitId};
use crate::storage::HabitStorage;
use crate::ServerError;

/// Parameters for updating a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub custom_interval: Option<u32>,
    pub category: Option<String>,
    /// Reactivate or pause the habit
    pub is_active: Option<bool>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub habit: Habit,
    pub message: String,
}

/// Update a habit's editable properties
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ServerError> {
    let habit_id = HabitId::from_string(&params.habit_id)?;

    let changes = HabitChanges {
        name: params.name,
        description: params.description,
        frequency: params.frequency,
        custom_interval: params.custom_interval,
        category: params.category,
        is_active: params.is_active,
        color: params.color,
        icon: params.icon,
    };

    let habit = storage.modify_habit(&habit_id, &mut |current| {
        let mut next = current.clone();
        next.update(changes.clone())?;
        Ok(Some(next))
    })?;

    let message = format!("✏️ Updated habit '{}'", habit.name);
    Ok(UpdateHabitResponse {
        success: true,
        habit,
        message,
    })
}

/// Parameters for deleting a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteHabitParams {
    pub habit_id: String,
    /// Keep the habit and its streak history but mark it inactive
    #[serde(default)]
    pub archive: bool,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub archived: bool,
    pub message: String,
}

/// Delete a habit, or archive it when requested
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ServerError> {
    let habit_id = HabitId::from_string(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;

    let message = if params.archive {
        storage.modify_habit(&habit_id, &mut |current| {
            if !current.is_active {
                return Ok(None);
            }
            let mut archived = current.clone();
            archived.deactivate();
            Ok(Some(archived))
        })?;
        format!("🪨 Archived habit '{}'. The fire rests, the history stays.", habit.name)
    } else {
        storage.delete_habit(&habit_id)?;
        format!("🗑️ Deleted habit '{}'", habit.name)
    };

    Ok(DeleteHabitResponse {
        success: true,
        archived: params.archive,
        message,
    })
}
