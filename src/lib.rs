/// Public library interface for the Caveman Tracker MCP server
///
/// This module exports the server, the streak engine, the statistics
/// calculator and the storage layer so they can be embedded or tested
/// directly.

use std::path::PathBuf;

use chrono::Local;
use thiserror::Error;

pub mod analytics;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod mcp;
pub mod quotes;
pub mod reminders;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{compute_dashboard_stats, StatsSnapshot};
pub use calendar::CalendarDay;
pub use config::{Config, ConfigError};
pub use domain::*;
pub use quotes::{QuotableClient, QuoteError, QuoteSource};
pub use reminders::ReminderSchedule;
pub use storage::{
    HabitFilter, HabitStorage, QuoteStorage, SqliteStorage, StorageError, TaskFilter, TaskStorage,
};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Quote service error: {0}")]
    Quote(#[from] QuoteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Habit {habit_id} is inactive and cannot be completed")]
    HabitInactive { habit_id: String },
}

impl ServerError {
    /// Stable, machine-readable error category
    ///
    /// One of `not_found`, `invalid_state`, `invalid_input`, `inactive`,
    /// `storage` or `internal`.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::Database(StorageError::HabitNotFound { .. })
            | ServerError::Database(StorageError::TaskNotFound { .. }) => "not_found",
            ServerError::Database(StorageError::CorruptRow { .. }) => "invalid_state",
            ServerError::Database(StorageError::Domain(e)) | ServerError::Domain(e) => {
                domain_kind(e)
            }
            ServerError::Database(_) => "storage",
            ServerError::InvalidInput(_) => "invalid_input",
            ServerError::HabitInactive { .. } => "inactive",
            ServerError::Config(_)
            | ServerError::Quote(_)
            | ServerError::Io(_)
            | ServerError::Json(_) => "internal",
        }
    }
}

fn domain_kind(error: &DomainError) -> &'static str {
    match error {
        DomainError::InvalidState { .. } => "invalid_state",
        _ => "invalid_input",
    }
}

/// Main tracker server that implements the MCP protocol
///
/// Owns the SQLite storage, the loaded configuration and, unless running
/// offline, the remote quote client.
pub struct TrackerServer {
    storage: SqliteStorage,
    config: Config,
    quote_source: Option<Box<dyn QuoteSource>>,
}

impl TrackerServer {
    /// Create a new tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist. `offline` disables the remote quote
    /// fetch regardless of configuration.
    pub fn new(db_path: PathBuf, config: Config, offline: bool) -> Result<Self, ServerError> {
        tracing::info!("Initializing Caveman Tracker server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Self::with_storage(storage, config, offline)
    }

    /// Build a server around an already opened storage
    pub fn with_storage(
        storage: SqliteStorage,
        config: Config,
        offline: bool,
    ) -> Result<Self, ServerError> {
        let quote_source: Option<Box<dyn QuoteSource>> = if offline || !config.quotes.enabled {
            tracing::info!("Remote quotes disabled, using cave wisdom only");
            None
        } else {
            Some(Box::new(QuotableClient::new(&config.quotes)?))
        };

        Ok(Self {
            storage,
            config,
            quote_source,
        })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        let habits = self.storage.list_habits(&HabitFilter::active())?;
        let purged = quotes::cleanup_old_quotes(
            &self.storage,
            Local::now().date_naive(),
            self.config.quotes.retention_days,
        )?;
        tracing::info!(
            "Server started successfully, found {} active habits, purged {} old quotes",
            habits.len(),
            purged
        );

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Streak continuity rule in effect for completions
    pub fn streak_policy(&self) -> StreakPolicy {
        self.config.streak_policy()
    }

    /// Remote quote client, absent when running offline
    pub fn quote_source(&self) -> Option<&dyn QuoteSource> {
        self.quote_source.as_deref()
    }

    pub fn reminder_schedule(&self) -> Result<ReminderSchedule, ServerError> {
        Ok(ReminderSchedule {
            morning: self.config.reminders.morning_time()?,
            evening: self.config.reminders.evening_time()?,
        })
    }
}
