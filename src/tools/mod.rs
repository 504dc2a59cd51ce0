/// MCP tools for habit and task management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the tracker. Each tool takes its typed parameters plus the
/// current date, so the tools themselves never read the clock.

pub mod calendar;
pub mod complete;
pub mod create;
pub mod digest;
pub mod list;
pub mod quote;
pub mod stats;
pub mod tasks;
pub mod update;

// Re-export tool functions for easy access
pub use calendar::*;
pub use complete::*;
pub use create::*;
pub use digest::*;
pub use list::*;
pub use quote::*;
pub use stats::*;
pub use tasks::*;
pub use update::*;

use chrono::NaiveTime;

use crate::ServerError;

/// Parse an `HH:MM` wall-clock time from tool input
pub(crate) fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ServerError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| {
        ServerError::InvalidInput(format!("{} must be HH:MM, got '{}'", field, value))
    })
}
