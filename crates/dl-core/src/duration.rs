//! Activity durations and their display form.

use std::fmt;

use serde::Serialize;

use crate::clock::{ClockTime, minutes_between};

/// How long an activity lasted.
///
/// Display code that only needs a number uses [`ActivityDuration::minutes`],
/// which folds the non-duration cases into zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "minutes", rename_all = "snake_case")]
pub enum ActivityDuration {
    /// Start and end both parsed.
    Minutes(u32),
    /// No end time was recorded.
    PointInTime,
    /// Start or end could not be parsed.
    Unparseable,
}

impl ActivityDuration {
    #[must_use]
    pub const fn minutes(self) -> u32 {
        match self {
            Self::Minutes(minutes) => minutes,
            Self::PointInTime | Self::Unparseable => 0,
        }
    }

    #[must_use]
    pub const fn is_unparseable(self) -> bool {
        matches!(self, Self::Unparseable)
    }
}

impl fmt::Display for ActivityDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes(minutes) => f.pad(&format_duration(*minutes)),
            Self::PointInTime => f.pad("-"),
            Self::Unparseable => f.pad("?"),
        }
    }
}

/// Classifies the span between two stored clock strings.
pub fn activity_duration(start: &str, end: Option<&str>) -> ActivityDuration {
    let Some(end) = end else {
        return ActivityDuration::PointInTime;
    };
    match (ClockTime::parse(start), ClockTime::parse(end)) {
        (Ok(start), Ok(end)) => ActivityDuration::Minutes(minutes_between(start, end)),
        (Err(err), _) | (_, Err(err)) => {
            tracing::debug!(%err, start, end, "duration unknown");
            ActivityDuration::Unparseable
        }
    }
}

/// Minutes from `start` to `end`, or 0 when there is no end or either side
/// fails to parse.
pub fn compute_duration_minutes(start: &str, end: Option<&str>) -> u32 {
    activity_duration(start, end).minutes()
}

/// Renders minutes as `"2h 5m"`, `"2h"`, `"5m"` or `"0m"`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, 0) => "0m".to_string(),
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
