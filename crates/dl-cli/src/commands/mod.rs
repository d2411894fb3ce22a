//! CLI subcommand implementations.

pub mod ai;
pub mod goals;
pub mod log;
pub mod remind;
pub mod show;
pub mod streak;
pub mod tasks;
pub mod util;
