/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier types and the Frequency enum that are
/// used by Habit, Completion, and the streak engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a habit ID where a completion ID is expected. Serialized as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading and URL paths)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a completion record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionId(pub Uuid);

impl CompletionId {
    /// Generate a new random completion ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a completion ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for CompletionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompletionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How often a habit should be performed
///
/// Frequency is advisory: it is stored and returned to clients, but streaks
/// and the completion rate are computed the same way for every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every single day
    #[default]
    Daily,
    /// Some days of the week
    Weekly,
    /// User-defined schedule
    Custom,
}

impl Frequency {
    /// Storage/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            other => Err(DomainError::InvalidFrequency(format!(
                "'{}' is not one of: daily, weekly, custom",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_habit_id_parses_its_own_display() {
        let id = HabitId::new();
        let parsed = HabitId::from_string(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_habit_id_rejects_garbage() {
        assert!(HabitId::from_string("not-a-uuid").is_err());
        assert!(HabitId::from_string("").is_err());
    }

    #[test]
    fn test_frequency_parsing_is_case_insensitive() {
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!(" custom ".parse::<Frequency>().unwrap(), Frequency::Custom);
        assert!("hourly".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_frequency_serializes_lowercase() {
        let json = serde_json::to_string(&Frequency::Daily).unwrap();
        assert_eq!(json, "\"daily\"");
    }
}
