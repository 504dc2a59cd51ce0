/// Storage layer for persisting tracker data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits, tasks and daily
/// quotes.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{DailyQuote, DomainError, Habit, HabitId, Priority, Task, TaskId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: &'static str, message: String },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Which habits a listing should return
#[derive(Debug, Clone, Default)]
pub struct HabitFilter {
    pub active_only: bool,
    pub category: Option<String>,
}

impl HabitFilter {
    pub fn active() -> Self {
        Self {
            active_only: true,
            category: None,
        }
    }

    pub fn all() -> Self {
        Self::default()
    }
}

/// Which tasks a listing should return
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub include_completed: bool,
    pub category: Option<String>,
    pub priority: Option<Priority>,
    pub due_on: Option<NaiveDate>,
    /// Inclusive `(from, until)` range matched against the due date or the
    /// completion date
    pub touching: Option<(NaiveDate, NaiveDate)>,
}

/// Callback used by [`HabitStorage::modify_habit`]
///
/// Receives the freshly loaded habit; returning `Some` persists the new value,
/// `None` leaves the stored habit untouched.
pub type HabitModifier<'a> = dyn FnMut(&Habit) -> Result<Option<Habit>, DomainError> + 'a;

/// Trait defining the storage interface for habits
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Upsert a habit, replacing every stored field
    fn save_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Permanently remove a habit
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List habits, newest first
    fn list_habits(&self, filter: &HabitFilter) -> Result<Vec<Habit>, StorageError>;

    /// Distinct categories of active habits
    fn habit_categories(&self) -> Result<Vec<String>, StorageError>;

    /// Load, transform and persist a habit as one atomic step
    ///
    /// Concurrent callers on the same storage are serialized, so two
    /// completions of the same habit can never interleave their
    /// read-modify-write. Returns the habit as stored afterwards.
    fn modify_habit(
        &self,
        habit_id: &HabitId,
        modify: &mut HabitModifier<'_>,
    ) -> Result<Habit, StorageError>;
}

/// Trait defining the storage interface for tasks
pub trait TaskStorage {
    fn create_task(&self, task: &Task) -> Result<(), StorageError>;

    fn get_task(&self, task_id: &TaskId) -> Result<Task, StorageError>;

    /// Upsert a task, replacing every stored field
    fn save_task(&self, task: &Task) -> Result<(), StorageError>;

    fn delete_task(&self, task_id: &TaskId) -> Result<(), StorageError>;

    /// List tasks by priority (highest first), then due date (undated last),
    /// then creation date
    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, StorageError>;

    /// Distinct task categories
    fn task_categories(&self) -> Result<Vec<String>, StorageError>;
}

/// Trait defining the storage interface for daily quotes
pub trait QuoteStorage {
    fn get_quote(&self, date: NaiveDate) -> Result<Option<DailyQuote>, StorageError>;

    /// Insert a quote unless one already exists for its date
    ///
    /// Returns the record that is stored for that date afterwards.
    fn insert_quote(&self, quote: &DailyQuote) -> Result<DailyQuote, StorageError>;

    /// Remove quotes dated before `cutoff`, returning how many were deleted
    fn delete_quotes_before(&self, cutoff: NaiveDate) -> Result<usize, StorageError>;
}
