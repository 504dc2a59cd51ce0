/// Tools for task ("rock") management
///
/// This module implements task_create, task_update, task_complete,
/// task_uncomplete, task_delete and task_list.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Priority, Task, TaskChanges, TaskId};
use crate::storage::{TaskFilter, TaskStorage};
use crate::tools::parse_time;
use crate::ServerError;

/// Parameters for creating a task
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateTaskParams {
    /// Title of the task (1-200 characters)
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// low, medium, high or urgent (default: medium)
    pub priority: Option<Priority>,
    /// Due date (YYYY-MM-DD)
    pub due_date: Option<NaiveDate>,
    /// Due time (HH:MM)
    pub due_time: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub estimated_minutes: Option<u32>,
}

/// Response carrying a single task
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub task: Task,
    pub message: String,
}

pub fn create_task<S: TaskStorage>(
    storage: &S,
    params: CreateTaskParams,
) -> Result<TaskResponse, ServerError> {
    let due_time = params
        .due_time
        .as_deref()
        .map(|value| parse_time("due_time", value))
        .transpose()?;

    let task = Task::new(
        params.title,
        params.description.unwrap_or_default(),
        params.category.unwrap_or_default(),
        params.priority.unwrap_or(Priority::Medium),
        params.due_date,
        params.estimated_minutes.unwrap_or(0),
    )?
    .with_due_time(due_time)
    .with_tags(params.tags);

    storage.create_task(&task)?;

    let message = format!("🗿 New {} to move: '{}'", task.priority.display_name(), task.title);
    Ok(TaskResponse {
        success: true,
        task,
        message,
    })
}

/// Parameters for editing a task
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateTaskParams {
    pub task_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    /// Remove the due date (and due time)
    #[serde(default)]
    pub clear_due_date: bool,
    pub due_time: Option<String>,
    pub tags: Option<Vec<String>>,
    pub estimated_minutes: Option<u32>,
    pub actual_minutes: Option<u32>,
}

pub fn update_task<S: TaskStorage>(
    storage: &S,
    params: UpdateTaskParams,
) -> Result<TaskResponse, ServerError> {
    let task_id = TaskId::from_string(&params.task_id)?;
    let mut task = storage.get_task(&task_id)?;

    if params.clear_due_date && params.due_date.is_some() {
        return Err(ServerError::InvalidInput(
            "due_date and clear_due_date cannot be combined".to_string(),
        ));
    }

    let due_time = params
        .due_time
        .as_deref()
        .map(|value| parse_time("due_time", value))
        .transpose()?;

    let (due_date, due_time) = if params.clear_due_date {
        (Some(None), Some(None))
    } else {
        (params.due_date.map(Some), due_time.map(Some))
    };

    task.update(TaskChanges {
        title: params.title,
        description: params.description,
        category: params.category,
        due_date,
        due_time,
        priority: params.priority,
        tags: params.tags,
        estimated_minutes: params.estimated_minutes,
        actual_minutes: params.actual_minutes,
    })?;
    storage.save_task(&task)?;

    let message = format!("✏️ Updated task '{}'", task.title);
    Ok(TaskResponse {
        success: true,
        task,
        message,
    })
}

/// Parameters identifying one task
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskIdParams {
    pub task_id: String,
}

/// Parameters for completing a task
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompleteTaskParams {
    pub task_id: String,
    /// Completion day (YYYY-MM-DD), defaults to today
    pub date: Option<NaiveDate>,
    /// Minutes actually spent
    pub actual_minutes: Option<u32>,
}

pub fn complete_task<S: TaskStorage>(
    storage: &S,
    params: CompleteTaskParams,
    today: NaiveDate,
) -> Result<TaskResponse, ServerError> {
    let task_id = TaskId::from_string(&params.task_id)?;
    let mut task = storage.get_task(&task_id)?;

    if let Some(minutes) = params.actual_minutes {
        task.update(TaskChanges {
            actual_minutes: Some(minutes),
            ..Default::default()
        })?;
    }
    let applied = task.complete(params.date.unwrap_or(today));
    storage.save_task(&task)?;

    let message = if applied {
        format!("💪 Rock moved: '{}'", task.title)
    } else {
        format!("🗿 Rock '{}' was already moved", task.title)
    };
    Ok(TaskResponse {
        success: true,
        task,
        message,
    })
}

pub fn uncomplete_task<S: TaskStorage>(
    storage: &S,
    params: TaskIdParams,
) -> Result<TaskResponse, ServerError> {
    let task_id = TaskId::from_string(&params.task_id)?;
    let mut task = storage.get_task(&task_id)?;

    task.uncomplete();
    storage.save_task(&task)?;

    let message = format!("↩️ '{}' is back on the pile", task.title);
    Ok(TaskResponse {
        success: true,
        task,
        message,
    })
}

/// Response from deleting a task
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    pub success: bool,
    pub message: String,
}

pub fn delete_task<S: TaskStorage>(
    storage: &S,
    params: TaskIdParams,
) -> Result<DeleteTaskResponse, ServerError> {
    let task_id = TaskId::from_string(&params.task_id)?;
    let task = storage.get_task(&task_id)?;
    storage.delete_task(&task_id)?;

    Ok(DeleteTaskResponse {
        success: true,
        message: format!("🗑️ Deleted task '{}'", task.title),
    })
}

/// Parameters for listing tasks
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListTasksParams {
    pub category: Option<String>,
    pub priority: Option<Priority>,
    /// Only tasks due on this day (YYYY-MM-DD)
    pub due_on: Option<NaiveDate>,
    /// Include completed tasks (default: false)
    #[serde(default)]
    pub include_completed: bool,
}

/// A task with its overdue flag as of today
#[derive(Debug, Serialize)]
pub struct TaskSummary {
    #[serde(flatten)]
    pub task: Task,
    pub is_overdue: bool,
}

/// Response from listing tasks
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    pub success: bool,
    pub tasks: Vec<TaskSummary>,
    pub categories: Vec<String>,
    pub message: String,
}

/// List tasks by priority, then due date (undated last), then creation date
pub fn list_tasks<S: TaskStorage>(
    storage: &S,
    params: ListTasksParams,
    today: NaiveDate,
) -> Result<ListTasksResponse, ServerError> {
    let filter = TaskFilter {
        include_completed: params.include_completed,
        category: params.category.filter(|c| !c.trim().is_empty()),
        priority: params.priority,
        due_on: params.due_on,
        touching: None,
    };

    let tasks: Vec<TaskSummary> = storage
        .list_tasks(&filter)?
        .into_iter()
        .map(|task| TaskSummary {
            is_overdue: task.is_overdue(today),
            task,
        })
        .collect();
    let categories = storage.task_categories()?;

    let message = if tasks.is_empty() {
        "No rocks to move. Enjoy the sun!".to_string()
    } else {
        let overdue = tasks.iter().filter(|t| t.is_overdue).count();
        format!("🗿 {} tasks, {} overdue", tasks.len(), overdue)
    };

    Ok(ListTasksResponse {
        success: true,
        tasks,
        categories,
        message,
    })
}
