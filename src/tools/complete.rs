/// Tool for completing habits
///
/// This module implements the habit_complete MCP tool and the completion
/// service behind it: load the habit, run the streak engine and persist the
/// result as one atomic storage step.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{self, streak_message, Completion, Habit, HabitId, StreakChange, StreakPolicy};
use crate::storage::HabitStorage;
use crate::ServerError;

/// Complete a habit on `event_date`
///
/// Unknown ids yield a not-found error and inactive habits are refused
/// before the engine runs. Completing twice on the same day returns
/// `applied == false` and leaves the stored habit untouched.
pub fn complete_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    habit_id: &HabitId,
    event_date: NaiveDate,
    policy: StreakPolicy,
) -> Result<Completion, ServerError> {
    let mut outcome: Option<Completion> = None;

    let stored = storage.modify_habit(habit_id, &mut |current| {
        if !current.is_active {
            return Ok(None);
        }
        let completion = domain::complete_habit(current, event_date, policy)?;
        let next = completion.applied.then(|| completion.habit.clone());
        outcome = Some(completion);
        Ok(next)
    })?;

    match outcome {
        Some(completion) => Ok(Completion {
            habit: stored,
            ..completion
        }),
        None => Err(ServerError::HabitInactive {
            habit_id: habit_id.to_string(),
        }),
    }
}

/// Parameters for completing a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompleteHabitParams {
    pub habit_id: String,
    /// Day of the completion (YYYY-MM-DD), defaults to today
    pub date: Option<NaiveDate>,
}

/// Response from completing a habit
#[derive(Debug, Serialize)]
pub struct CompleteHabitResponse {
    pub success: bool,
    /// False when the habit was already completed that day
    pub applied: bool,
    pub change: StreakChange,
    pub habit: Habit,
    pub message: String,
}

/// Run the habit_complete tool
pub fn habit_complete<S: HabitStorage + ?Sized>(
    storage: &S,
    params: CompleteHabitParams,
    today: NaiveDate,
    policy: StreakPolicy,
) -> Result<CompleteHabitResponse, ServerError> {
    let habit_id = HabitId::from_string(&params.habit_id)?;
    let event_date = params.date.unwrap_or(today);

    let completion = complete_habit(storage, &habit_id, event_date, policy)?;

    let message = match completion.change {
        StreakChange::Unchanged => format!(
            "'{}' already done on {}. Fire still burning at {}.",
            completion.habit.name, event_date, completion.habit.streak
        ),
        StreakChange::Reset => format!(
            "Fire went out, but '{}' is lit again. Streak restarts at 1 (best {}).",
            completion.habit.name, completion.habit.best_streak
        ),
        StreakChange::Started | StreakChange::Extended => format!(
            "✅ '{}' done! {}",
            completion.habit.name,
            streak_message(completion.habit.streak)
        ),
    };

    Ok(CompleteHabitResponse {
        success: true,
        applied: completion.applied,
        change: completion.change,
        habit: completion.habit,
        message,
    })
}
