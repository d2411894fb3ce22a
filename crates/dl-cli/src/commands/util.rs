//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Utc};
use dl_core::ClockTime;
use regex::Regex;

/// Pre-compiled regex for relative day parsing.
static RELATIVE_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+days?\s+ago$").unwrap());

/// Conservative bound for relative day parsing (~1000 years).
const MAX_RELATIVE_DAYS: i64 = 1000 * 366;

/// The current instant as the commands need it.
///
/// Captured once per invocation and passed down, so every command can be run
/// against a fixed point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Now {
    /// Local wall-clock time. Its date is "today" for every command, both
    /// for filing entries and for streaks, goals and reminders.
    pub local: NaiveDateTime,
    /// Milliseconds since the Unix epoch, used for new activity ids.
    pub epoch_ms: i64,
}

impl Now {
    pub fn system() -> Self {
        let utc = Utc::now();
        Self {
            local: utc.with_timezone(&Local).naive_local(),
            epoch_ms: utc.timestamp_millis(),
        }
    }

    /// A fixed instant where local time and UTC coincide.
    pub fn fixed(local: NaiveDateTime) -> Self {
        Self {
            local,
            epoch_ms: local.and_utc().timestamp_millis(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.local.date()
    }

    pub fn clock(&self) -> ClockTime {
        ClockTime::from_naive_time(self.local.time())
    }
}

/// Parse a date argument.
///
/// Supports:
/// - "today", "yesterday"
/// - Relative: "3 days ago"
/// - ISO 8601 date: "2025-01-15"
pub fn parse_date(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    let Some(caps) = RELATIVE_DAY_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD, 'today', 'yesterday' or relative (e.g., '3 days ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    if n > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date value too large: {n} days");
    }
    Ok(today - Duration::days(n))
}

/// Resolves an optional date argument, defaulting to today.
pub fn resolve_date(arg: Option<&str>, now: Now) -> anyhow::Result<NaiveDate> {
    arg.map_or_else(|| Ok(now.today()), |s| parse_date(s, now.today()))
}
