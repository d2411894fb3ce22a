//! Core domain logic for the daily activity log.
//!
//! This crate contains the fundamental types and logic for:
//! - Clock times: parsing and formatting 12-hour strings like `"7:05 AM"`
//! - Durations: activity spans with midnight rollover
//! - Streaks: current and longest runs of consecutive days
//! - Summaries, weekly goals, and reminders over the day log
//!
//! Every function here is pure. Anything that depends on the current time
//! takes it as a parameter.

pub mod catalog;
pub mod clock;
mod duration;
pub mod goal;
pub mod model;
pub mod reminder;
mod streak;
mod summary;
pub mod types;

pub use catalog::{TaskCatalog, TaskDef};
pub use clock::{ClockParseError, ClockTime, minutes_between, parse_clock_time};
pub use duration::{
    ActivityDuration, activity_duration, compute_duration_minutes, format_duration,
};
pub use goal::{Goal, GoalPeriod, GoalProgress, goal_progress, week_bounds};
pub use model::{Activity, ActivityPatch, Day, DayLog};
pub use reminder::{Reminder, check_reminder};
pub use streak::{Streaks, compute_streaks};
pub use summary::{ActivityLine, DaySummary, TaskTotal, summarize_day};
pub use types::{ActivityId, ValidationError};
