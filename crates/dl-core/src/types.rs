//! Core type definitions with validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::ClockParseError;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A clock field did not parse.
    #[error("invalid {field}: {source}")]
    Clock {
        field: &'static str,
        #[source]
        source: ClockParseError,
    },

    /// A point-in-time task was given an end time.
    #[error("{task} is a point-in-time task and takes no end time")]
    PointInTimeWithEnd { task: String },

    /// Goal frequency must be at least one.
    #[error("goal frequency must be at least 1")]
    ZeroFrequency,

    /// A name that must be unique is already taken.
    #[error("{kind} already exists: {name}")]
    Duplicate { kind: &'static str, name: String },

    /// A lookup by name or id found nothing.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// Invalid goal period value.
    #[error("invalid goal period: {value}")]
    InvalidPeriod { value: String },
}

/// Identifier of an activity: milliseconds since the Unix epoch at creation,
/// kept strictly increasing within a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(i64);

impl ActivityId {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActivityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn non_empty(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_id_serializes_as_number() {
        let id = ActivityId::new(1_736_000_000_000);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "1736000000000");
        let parsed: ActivityId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn activity_id_from_str() {
        assert_eq!(" 42 ".parse::<ActivityId>().unwrap(), ActivityId::new(42));
        assert!("abc".parse::<ActivityId>().is_err());
    }

    #[test]
    fn non_empty_trims_and_rejects_blank() {
        assert_eq!(non_empty("  Work ", "task").unwrap(), "Work");
        assert_eq!(
            non_empty("   ", "task"),
            Err(ValidationError::Empty { field: "task" })
        );
    }

    #[test]
    fn clock_error_message_names_field() {
        let err = ValidationError::Clock {
            field: "start time",
            source: ClockParseError::Marker("am".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "invalid start time: unknown marker \"am\", expected AM or PM"
        );
    }
}
