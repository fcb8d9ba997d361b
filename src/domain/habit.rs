/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a user's habit
/// they want to track, along with creation defaults, partial updates and
/// validation.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, FixedOffset};
use crate::domain::{DomainError, Frequency, HabitId};

/// Color used when the client does not pick one
pub const DEFAULT_COLOR: &str = "#3B82F6";

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

/// A habit represents something the user wants to do regularly
///
/// Timestamps keep the offset they were captured in, so normalizing
/// `created_at` yields the local day the habit was created on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier, assigned once at creation
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read for 30min")
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// How often this habit should be performed (advisory)
    pub frequency: Frequency,
    /// Display color as `#RRGGBB`
    pub color: String,
    /// Optional free-form category
    pub category: Option<String>,
    /// When this habit was created
    pub created_at: DateTime<FixedOffset>,
    /// When this habit was last modified
    pub updated_at: DateTime<FixedOffset>,
}

/// Input for creating a habit; unset fields fall back to defaults
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub color: Option<String>,
    pub category: Option<String>,
}

/// A partial update; `None` leaves the field untouched
///
/// An empty description or category clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub color: Option<String>,
    pub category: Option<String>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// Assigns a fresh identifier and stamps both timestamps with `now`.
    pub fn new(input: NewHabit, now: DateTime<FixedOffset>) -> Result<Self, DomainError> {
        let name = Self::validate_name(&input.name)?;
        let description = Self::validate_description(input.description)?;

        let color = match input.color.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_COLOR.to_string(),
            Some(color) => Self::validate_color(color)?,
        };

        Ok(Self {
            id: HabitId::new(),
            name,
            description,
            frequency: input.frequency.unwrap_or_default(),
            color,
            category: blank_to_none(input.category),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update with validation
    ///
    /// Nothing is modified unless every supplied field is valid. `updated_at`
    /// moves to `now` whenever the call succeeds.
    pub fn apply(&mut self, changes: HabitChanges, now: DateTime<FixedOffset>) -> Result<(), DomainError> {
        let name = changes.name.as_deref().map(Self::validate_name).transpose()?;
        let color = changes.color.as_deref().map(Self::validate_color).transpose()?;
        let description = match changes.description {
            Some(desc) => Some(Self::validate_description(Some(desc))?),
            None => None,
        };

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(frequency) = changes.frequency {
            self.frequency = frequency;
        }
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(category) = changes.category {
            self.category = blank_to_none(Some(category));
        }
        self.updated_at = now;

        Ok(())
    }

    // Validation helper methods

    /// Validate habit name according to business rules, returning it trimmed
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "name is required".to_string()
            ));
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidHabitName(format!(
                "name cannot be longer than {} characters",
                MAX_NAME_LEN
            )));
        }

        Ok(trimmed.to_string())
    }

    fn validate_description(description: Option<String>) -> Result<Option<String>, DomainError> {
        let description = blank_to_none(description);
        if let Some(desc) = &description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::Validation {
                    message: format!(
                        "description cannot be longer than {} characters",
                        MAX_DESCRIPTION_LEN
                    ),
                });
            }
        }
        Ok(description)
    }

    /// Colors are `#` followed by six hex digits
    fn validate_color(color: &str) -> Result<String, DomainError> {
        let color = color.trim();
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());

        if !valid {
            return Err(DomainError::InvalidColor(format!(
                "'{}' is not a #RRGGBB hex color",
                color
            )));
        }
        Ok(color.to_string())
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
