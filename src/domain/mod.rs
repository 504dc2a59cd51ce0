/// Habits, tasks and quotes, plus the streak engine
///
/// No I/O happens here. Apart from creation stamps, callers pass in the
/// calendar date they mean.

pub mod habit;
pub mod quote;
pub mod streak;
pub mod task;
pub mod types;

pub use habit::*;
pub use quote::*;
pub use streak::*;
pub use task::*;
pub use types::*;

use thiserror::Error;

/// Rejected input or a value that breaks an entity invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid task title: {0}")]
    InvalidTaskTitle(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },

    /// A stored entity violates one of its invariants
    #[error("Invalid state for {entity} {id}: {reason}")]
    InvalidState {
        entity: &'static str,
        id: String,
        reason: String,
    },
}
