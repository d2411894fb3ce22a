//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dl_core::ActivityId;

use crate::commands::ai::HistoryArgs;
use crate::commands::goals::GoalAction;
use crate::commands::log::{EditArgs, LogArgs};
use crate::commands::show::ShowArgs;
use crate::commands::streak::StreakArgs;
use crate::commands::tasks::TaskAction;

/// Daily activity log.
///
/// Records what you do through the day, keeps streaks and weekly goals, and
/// can ask Gemini for suggestions and summaries.
#[derive(Debug, Parser)]
#[command(name = "dl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log an activity.
    Log(LogArgs),

    /// Change a logged activity.
    Edit(EditArgs),

    /// Remove a logged activity.
    Rm {
        /// Activity id, as printed by `dl show`.
        id: ActivityId,
    },

    /// Show one day's activities and totals.
    Show(ShowArgs),

    /// List every day that has a record.
    Days {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a whole day.
    DeleteDay {
        /// Date to delete (YYYY-MM-DD, today, yesterday, "N days ago").
        date: String,
    },

    /// Show current and longest streaks.
    Streak(StreakArgs),

    /// Manage the task catalog.
    #[command(subcommand)]
    Tasks(TaskAction),

    /// Manage weekly goals.
    #[command(subcommand)]
    Goals(GoalAction),

    /// Remind you to log when the day has gone quiet.
    Remind {
        /// Keep checking every `reminder_interval_minutes`.
        #[arg(long)]
        watch: bool,
    },

    /// Ask Gemini what you are most likely doing now.
    Suggest,

    /// Ask Gemini for a summary of recent days.
    Summarize(HistoryArgs),

    /// Ask Gemini for observations on habits and goals.
    Insights(HistoryArgs),
}
