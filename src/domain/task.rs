/// Task entity for one-off units of work
///
/// Tasks carry a priority, an optional due date/time and a completion flag
/// whose completion date is kept in lockstep with it.

use chrono::{Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Priority, TaskId};

/// A one-off piece of work ("rock") the user wants to move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
    pub priority: Priority,
    pub is_completed: bool,
    /// Present exactly when `is_completed` is true
    pub completed_on: Option<NaiveDate>,
    pub created_on: NaiveDate,
    pub tags: Vec<String>,
    pub estimated_minutes: u32,
    pub actual_minutes: u32,
}

/// Editable task properties; `None` leaves a field unchanged
///
/// `due_date` and `due_time` use a nested option so a caller can clear them.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<Option<NaiveDate>>,
    pub due_time: Option<Option<NaiveTime>>,
    pub priority: Option<Priority>,
    pub tags: Option<Vec<String>>,
    pub estimated_minutes: Option<u32>,
    pub actual_minutes: Option<u32>,
}

impl Task {
    /// Create a new, not yet completed task
    pub fn new(
        title: String,
        description: String,
        category: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
        estimated_minutes: u32,
    ) -> Result<Self, DomainError> {
        Self::validate_title(&title)?;
        Self::validate_description(&description)?;
        Self::validate_minutes(estimated_minutes)?;

        Ok(Self {
            id: TaskId::new(),
            title: title.trim().to_string(),
            description,
            category: category.trim().to_string(),
            due_date,
            due_time: None,
            priority,
            is_completed: false,
            completed_on: None,
            created_on: Local::now().date_naive(),
            tags: Vec::new(),
            estimated_minutes,
            actual_minutes: 0,
        })
    }

    pub fn with_due_time(mut self, due_time: Option<NaiveTime>) -> Self {
        self.due_time = due_time;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = normalize_tags(tags);
        self
    }

    /// Mark the task done on `date`
    ///
    /// Only the first completion records a date; completing a task that is
    /// already done changes nothing and returns `false`.
    pub fn complete(&mut self, date: NaiveDate) -> bool {
        if self.is_completed {
            return false;
        }
        self.is_completed = true;
        self.completed_on = Some(date);
        true
    }

    /// Reopen the task, clearing its completion date
    pub fn uncomplete(&mut self) {
        self.is_completed = false;
        self.completed_on = None;
    }

    /// Incomplete and due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed && self.due_date.is_some_and(|due| due < today)
    }

    /// Incomplete and due on `date`
    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        !self.is_completed && self.due_date == Some(date)
    }

    /// Apply a direct edit with validation; completion state is not editable here
    pub fn update(&mut self, changes: TaskChanges) -> Result<(), DomainError> {
        if let Some(ref title) = changes.title {
            Self::validate_title(title)?;
        }
        if let Some(ref description) = changes.description {
            Self::validate_description(description)?;
        }
        if let Some(minutes) = changes.estimated_minutes {
            Self::validate_minutes(minutes)?;
        }
        if let Some(minutes) = changes.actual_minutes {
            Self::validate_minutes(minutes)?;
        }

        if let Some(title) = changes.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(category) = changes.category {
            self.category = category.trim().to_string();
        }
        if let Some(due_date) = changes.due_date {
            self.due_date = due_date;
        }
        if let Some(due_time) = changes.due_time {
            self.due_time = due_time;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(tags) = changes.tags {
            self.tags = normalize_tags(tags);
        }
        if let Some(minutes) = changes.estimated_minutes {
            self.estimated_minutes = minutes;
        }
        if let Some(minutes) = changes.actual_minutes {
            self.actual_minutes = minutes;
        }
        Ok(())
    }

    /// Check that the completion date agrees with the completion flag
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.is_completed != self.completed_on.is_some() {
            return Err(DomainError::InvalidState {
                entity: "task",
                id: self.id.to_string(),
                reason: format!(
                    "completed flag is {} but completion date is {}",
                    self.is_completed,
                    if self.completed_on.is_some() { "set" } else { "missing" }
                ),
            });
        }
        Ok(())
    }

    fn validate_title(title: &str) -> Result<(), DomainError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTaskTitle(
                "Task title cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > 200 {
            return Err(DomainError::InvalidTaskTitle(
                "Task title cannot be longer than 200 characters".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_description(description: &str) -> Result<(), DomainError> {
        if description.chars().count() > 1000 {
            return Err(DomainError::Validation {
                message: "Description cannot be longer than 1000 characters".to_string(),
            });
        }
        Ok(())
    }

    fn validate_minutes(minutes: u32) -> Result<(), DomainError> {
        // a full week of effort is the ceiling
        if minutes > 10_080 {
            return Err(DomainError::InvalidValue {
                message: "Minutes cannot exceed 10080".to_string(),
            });
        }
        Ok(())
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
