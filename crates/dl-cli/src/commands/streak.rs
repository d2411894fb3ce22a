//! Streak command.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use dl_core::{Streaks, compute_streaks};
use dl_db::Database;
use serde::Serialize;

use super::util::Now;

#[derive(Debug, Args)]
pub struct StreakArgs {
    /// Only count days containing this task.
    #[arg(long)]
    pub task: Option<String>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StreakRow {
    /// `None` for the overall streak.
    task: Option<String>,
    #[serde(flatten)]
    streaks: Streaks,
}

impl StreakRow {
    fn label(&self) -> &str {
        self.task.as_deref().unwrap_or("Overall")
    }
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &StreakArgs, now: Now) -> Result<()> {
    let catalog = db.load_tasks().context("failed to load tasks")?;
    let days = db.load_days().context("failed to load days")?;
    let today = now.today();

    let rows: Vec<StreakRow> = if let Some(task) = &args.task {
        let task = catalog.canonical_name(task);
        vec![StreakRow {
            task: Some(task.to_string()),
            streaks: compute_streaks(days.days(), Some(task), today),
        }]
    } else {
        std::iter::once(None)
            .chain(catalog.iter().map(|task| Some(task.name.as_str())))
            .map(|task| StreakRow {
                task: task.map(str::to_string),
                streaks: compute_streaks(days.days(), task, today),
            })
            .collect()
    };

    if args.json {
        let json = if args.task.is_some() {
            serde_json::to_string_pretty(&rows[0])?
        } else {
            serde_json::to_string_pretty(&rows)?
        };
        writeln!(writer, "{json}")?;
        return Ok(());
    }

    for row in &rows {
        writeln!(
            writer,
            "{:<12} current {:>3}  longest {:>3}",
            row.label(),
            row.streaks.current,
            row.streaks.longest
        )?;
    }
    Ok(())
}
