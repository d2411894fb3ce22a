//! 12-hour wall-clock times such as `"7:05 AM"`.
//!
//! A [`ClockTime`] is a time of day only. It carries no calendar date, so two
//! values can be compared but not placed on a timeline across days.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Why a clock string could not be parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockParseError {
    /// The hour and minute were not separated by `:`.
    #[error("missing ':' separator in {0:?}")]
    MissingSeparator(String),
    /// The string did not have exactly a time token and a marker token.
    #[error("expected \"H:MM AM\" or \"H:MM PM\", got {0:?}")]
    Shape(String),
    /// Hour or minute was not a number.
    #[error("non-numeric {field} in {input:?}")]
    NotNumeric { field: &'static str, input: String },
    /// Hour outside 1..=12 or minute outside 0..=59.
    #[error("{field} out of range in {input:?}")]
    OutOfRange { field: &'static str, input: String },
    /// Marker other than `AM` or `PM`.
    #[error("unknown marker {0:?}, expected AM or PM")]
    Marker(String),
}

/// A time of day, stored as a 24-hour hour and a minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Builds a clock time from a 24-hour hour and a minute.
    ///
    /// Returns `None` when `hour > 23` or `minute > 59`.
    #[must_use]
    pub const fn from_hm(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// Truncates a `NaiveTime` to the minute.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "chrono guarantees hour < 24 and minute < 60"
    )]
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    /// Parses `"H:MM AM"` / `"H:MM PM"`.
    pub fn parse(text: &str) -> Result<Self, ClockParseError> {
        let trimmed = text.trim();
        let mut tokens = trimmed.split_whitespace();
        let (Some(time), Some(marker), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            if !trimmed.contains(':') {
                return Err(ClockParseError::MissingSeparator(text.to_string()));
            }
            return Err(ClockParseError::Shape(text.to_string()));
        };

        let Some((hour, minute)) = time.split_once(':') else {
            return Err(ClockParseError::MissingSeparator(text.to_string()));
        };

        let hour12 = parse_component(hour, "hour", text)?;
        let minute = parse_component(minute, "minute", text)?;
        if !(1..=12).contains(&hour12) {
            return Err(ClockParseError::OutOfRange {
                field: "hour",
                input: text.to_string(),
            });
        }
        if minute > 59 {
            return Err(ClockParseError::OutOfRange {
                field: "minute",
                input: text.to_string(),
            });
        }

        let hour = match marker {
            "AM" if hour12 == 12 => 0,
            "AM" => hour12,
            "PM" if hour12 == 12 => 12,
            "PM" => hour12 + 12,
            other => return Err(ClockParseError::Marker(other.to_string())),
        };

        Ok(Self { hour, minute })
    }

    /// Hour in 24-hour form (0..=23).
    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    #[must_use]
    pub const fn minutes_since_midnight(self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }

    /// Converts to a `NaiveTime` at zero seconds.
    #[must_use]
    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

fn parse_component(raw: &str, field: &'static str, input: &str) -> Result<u8, ClockParseError> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ClockParseError::NotNumeric {
            field,
            input: input.to_string(),
        });
    }
    raw.parse().map_err(|_| ClockParseError::NotNumeric {
        field,
        input: input.to_string(),
    })
}

impl FromStr for ClockTime {
    type Err = ClockParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (hour12, marker) = match self.hour {
            0 => (12, "AM"),
            h @ 1..=11 => (h, "AM"),
            12 => (12, "PM"),
            h => (h - 12, "PM"),
        };
        write!(f, "{hour12}:{:02} {marker}", self.minute)
    }
}

/// Fail-soft parse: malformed input yields `None`.
pub fn parse_clock_time(text: &str) -> Option<ClockTime> {
    match ClockTime::parse(text) {
        Ok(time) => Some(time),
        Err(err) => {
            tracing::debug!(%err, "unparseable clock time");
            None
        }
    }
}

/// Minutes from `start` to `end`, wrapping past midnight.
///
/// A negative raw difference means the span crossed midnight, so the result
/// is always in `0..1440`.
#[must_use]
pub const fn minutes_between(start: ClockTime, end: ClockTime) -> u32 {
    let start = start.minutes_since_midnight();
    let end = end.minutes_since_midnight();
    if end >= start {
        end - start
    } else {
        end + MINUTES_PER_DAY - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(text: &str) -> (u8, u8) {
        let t = ClockTime::parse(text).unwrap();
        (t.hour(), t.minute())
    }

    #[test]
    fn parses_morning_and_evening() {
        assert_eq!(hm("7:05 AM"), (7, 5));
        assert_eq!(hm("7:05 PM"), (19, 5));
        assert_eq!(hm("11:59 PM"), (23, 59));
        assert_eq!(hm("  9:30 AM "), (9, 30));
    }

    #[test]
    fn twelve_oclock_edges() {
        assert_eq!(hm("12:00 AM"), (0, 0));
        assert_eq!(hm("12:30 AM"), (0, 30));
        assert_eq!(hm("12:00 PM"), (12, 0));
        assert_eq!(hm("12:45 PM"), (12, 45));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            ClockTime::parse("705 AM"),
            Err(ClockParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            ClockTime::parse("7:05"),
            Err(ClockParseError::Shape(_))
        ));
        assert!(matches!(
            ClockTime::parse("7:05 AM extra"),
            Err(ClockParseError::Shape(_))
        ));
        assert!(matches!(
            ClockTime::parse("7-05 AM"),
            Err(ClockParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            ClockTime::parse("x:05 AM"),
            Err(ClockParseError::NotNumeric { field: "hour", .. })
        ));
        assert!(matches!(
            ClockTime::parse("7:y5 AM"),
            Err(ClockParseError::NotNumeric {
                field: "minute",
                ..
            })
        ));
        assert!(matches!(
            ClockTime::parse("7:05 am"),
            Err(ClockParseError::Marker(_))
        ));
        assert!(ClockTime::parse("").is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            ClockTime::parse("13:00 PM"),
            Err(ClockParseError::OutOfRange { field: "hour", .. })
        ));
        assert!(matches!(
            ClockTime::parse("0:15 AM"),
            Err(ClockParseError::OutOfRange { field: "hour", .. })
        ));
        assert!(matches!(
            ClockTime::parse("7:60 AM"),
            Err(ClockParseError::OutOfRange {
                field: "minute",
                ..
            })
        ));
    }

    #[test]
    fn fail_soft_parse_returns_none() {
        assert_eq!(parse_clock_time("garbage"), None);
        assert_eq!(parse_clock_time("1:00 PM"), ClockTime::from_hm(13, 0));
    }

    #[test]
    fn display_is_canonical_twelve_hour() {
        assert_eq!(ClockTime::from_hm(0, 0).unwrap().to_string(), "12:00 AM");
        assert_eq!(ClockTime::from_hm(7, 5).unwrap().to_string(), "7:05 AM");
        assert_eq!(ClockTime::from_hm(12, 0).unwrap().to_string(), "12:00 PM");
        assert_eq!(ClockTime::from_hm(23, 9).unwrap().to_string(), "11:09 PM");
    }

    #[test]
    fn every_minute_of_the_day_round_trips() {
        for hour in 0..24 {
            for minute in 0..60 {
                let time = ClockTime::from_hm(hour, minute).unwrap();
                let parsed = ClockTime::parse(&time.to_string()).unwrap();
                assert_eq!(parsed, time, "round trip failed for {hour:02}:{minute:02}");
            }
        }
    }

    #[test]
    fn from_hm_rejects_out_of_range() {
        assert!(ClockTime::from_hm(24, 0).is_none());
        assert!(ClockTime::from_hm(0, 60).is_none());
    }

    #[test]
    fn from_naive_time_drops_seconds() {
        let time = NaiveTime::from_hms_opt(14, 7, 59).unwrap();
        assert_eq!(ClockTime::from_naive_time(time).to_string(), "2:07 PM");
    }

    #[test]
    fn minutes_between_wraps_midnight() {
        let late = ClockTime::parse("11:50 PM").unwrap();
        let early = ClockTime::parse("12:10 AM").unwrap();
        assert_eq!(minutes_between(late, early), 20);
        assert_eq!(minutes_between(early, late), 1420);
        assert_eq!(minutes_between(late, late), 0);
    }
}
