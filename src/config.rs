/// TOML-based tracker configuration
///
/// Settings live at `<config_dir>/caveman_tracker/config.toml`. A missing file
/// means defaults; every key inside the file is optional as well.

use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::StreakPolicy;

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid reminder time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// Daily quote settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    #[serde(default = "default_max_length")]
    pub max_length: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Quotes older than this many days are purged
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

/// Reminder times as `HH:MM` wall-clock strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_morning")]
    pub morning: String,
    #[serde(default = "default_evening")]
    pub evening: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitsConfig {
    /// Treat CUSTOM habits as consecutive when the gap equals their interval
    /// instead of exactly one day. Changes visible streak outcomes.
    #[serde(default)]
    pub custom_interval_continuity: bool,
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database_path: Option<PathBuf>,
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub habits: HabitsConfig,
}

fn default_true() -> bool {
    true
}
fn default_endpoint() -> String {
    "https://api.quotable.io/random".into()
}
fn default_min_length() -> u32 {
    50
}
fn default_max_length() -> u32 {
    200
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_retention_days() -> u32 {
    30
}
fn default_morning() -> String {
    "09:00".into()
}
fn default_evening() -> String {
    "19:00".into()
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            min_length: default_min_length(),
            max_length: default_max_length(),
            timeout_secs: default_timeout_secs(),
            retention_days: default_retention_days(),
        }
    }
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            morning: default_morning(),
            evening: default_evening(),
        }
    }
}

impl RemindersConfig {
    pub fn morning_time(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(&self.morning)
    }

    pub fn evening_time(&self) -> Result<NaiveTime, ConfigError> {
        parse_time(&self.evening)
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ConfigError::InvalidTime(value.to_string()))
}

impl Config {
    /// Default location of the config file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("caveman_tracker").join("config.toml"))
    }

    /// Load configuration from `path`, falling back to defaults if it is absent
    ///
    /// A file that exists but does not parse, or carries malformed reminder
    /// times, is an error rather than a silent fallback.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.reminders.morning_time()?;
        config.reminders.evening_time()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Streak continuity rule selected by `[habits]`
    pub fn streak_policy(&self) -> StreakPolicy {
        if self.habits.custom_interval_continuity {
            StreakPolicy::IntervalAware
        } else {
            StreakPolicy::Literal
        }
    }
}
