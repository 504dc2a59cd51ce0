/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a recurring
/// behavior the user tracks, along with its validation rules and the
/// invariants the streak engine relies on.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Frequency, HabitId};

pub const DEFAULT_HABIT_COLOR: &str = "#FF6347";
pub const DEFAULT_HABIT_ICON: &str = "🔥";

/// A habit represents something the user wants to do regularly
///
/// Streak fields are only advanced by the streak engine; edits through
/// [`Habit::update`] never touch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Make Fire", "Sharpen Spear")
    pub name: String,
    /// Free-text description, may be empty
    pub description: String,
    /// How often this habit should be performed
    pub frequency: Frequency,
    /// Interval in days, only meaningful for [`Frequency::Custom`]
    pub custom_interval: u32,
    /// Free-text category label used for grouping
    pub category: String,
    /// Current run of consecutive qualifying completions
    pub streak: u32,
    /// Best streak ever achieved, never decreases
    pub best_streak: u32,
    /// Day of the most recent completion (None if never completed)
    pub last_completed: Option<NaiveDate>,
    /// Day the habit was created
    pub created_on: NaiveDate,
    /// Inactive habits keep their history but are excluded from progress tracking
    pub is_active: bool,
    /// Cosmetic color tag, not interpreted
    pub color: String,
    /// Cosmetic icon tag, not interpreted
    pub icon: String,
}

/// Editable habit properties; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct HabitChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub custom_interval: Option<u32>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The habit starts active with no completions, so both streak fields are
    /// zero. `custom_interval` is normalized to 0 unless the frequency is
    /// CUSTOM.
    pub fn new(
        name: String,
        description: String,
        frequency: Frequency,
        custom_interval: u32,
        category: String,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;
        Self::validate_category(&category)?;
        let custom_interval = Self::normalize_interval(frequency, custom_interval)?;

        Ok(Self {
            id: HabitId::new(),
            name: name.trim().to_string(),
            description,
            frequency,
            custom_interval,
            category: category.trim().to_string(),
            streak: 0,
            best_streak: 0,
            last_completed: None,
            created_on: Local::now().date_naive(),
            is_active: true,
            color: DEFAULT_HABIT_COLOR.to_string(),
            icon: DEFAULT_HABIT_ICON.to_string(),
        })
    }

    /// Override the cosmetic tags
    pub fn with_appearance(mut self, color: Option<String>, icon: Option<String>) -> Self {
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(icon) = icon {
            self.icon = icon;
        }
        self
    }

    /// Apply a direct edit with validation
    ///
    /// All new values are validated before any of them is applied, so a
    /// failed update leaves the habit untouched.
    pub fn update(&mut self, changes: HabitChanges) -> Result<(), DomainError> {
        if let Some(ref name) = changes.name {
            Self::validate_name(name)?;
        }
        if let Some(ref description) = changes.description {
            Self::validate_description(description)?;
        }
        if let Some(ref category) = changes.category {
            Self::validate_category(category)?;
        }

        let frequency = changes.frequency.unwrap_or(self.frequency);
        // switching to CUSTOM without an interval keeps the stored one
        let interval = changes.custom_interval.unwrap_or(self.custom_interval);
        let custom_interval = Self::normalize_interval(frequency, interval)?;

        if let Some(name) = changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(category) = changes.category {
            self.category = category.trim().to_string();
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        if let Some(color) = changes.color {
            self.color = color;
        }
        if let Some(icon) = changes.icon {
            self.icon = icon;
        }
        self.frequency = frequency;
        self.custom_interval = custom_interval;

        Ok(())
    }

    /// Stop tracking progress while keeping streak history for display
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Whether the habit was already completed on `date`
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.last_completed == Some(date)
    }

    /// Check the streak invariants
    ///
    /// Returns `InvalidState` when the stored values are inconsistent, e.g. a
    /// best streak lower than the current one.
    pub fn validate_invariants(&self) -> Result<(), DomainError> {
        if self.best_streak < self.streak {
            return Err(self.invalid_state(format!(
                "best streak {} is lower than current streak {}",
                self.best_streak, self.streak
            )));
        }
        if self.last_completed.is_none() && self.streak != 0 {
            return Err(self.invalid_state(format!(
                "streak is {} but the habit was never completed",
                self.streak
            )));
        }
        Ok(())
    }

    fn invalid_state(&self, reason: String) -> DomainError {
        DomainError::InvalidState {
            entity: "habit",
            id: self.id.to_string(),
            reason,
        }
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string(),
            ));
        }

        Ok(())
    }

    fn validate_description(description: &str) -> Result<(), DomainError> {
        if description.chars().count() > 500 {
            return Err(DomainError::Validation {
                message: "Description cannot be longer than 500 characters".to_string(),
            });
        }
        Ok(())
    }

    fn validate_category(category: &str) -> Result<(), DomainError> {
        if category.trim().chars().count() > 50 {
            return Err(DomainError::Validation {
                message: "Category cannot be longer than 50 characters".to_string(),
            });
        }
        Ok(())
    }

    fn normalize_interval(frequency: Frequency, interval: u32) -> Result<u32, DomainError> {
        if frequency != Frequency::Custom {
            return Ok(0);
        }
        if interval == 0 {
            return Err(DomainError::InvalidFrequency(
                "Custom frequency needs an interval of at least 1 day".to_string(),
            ));
        }
        if interval > 365 {
            return Err(DomainError::InvalidFrequency(
                "Custom interval cannot be longer than 365 days".to_string(),
            ));
        }
        Ok(interval)
    }
}
