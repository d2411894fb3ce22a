//! Commands that write single activities: `log`, `edit` and `rm`.

use std::io::Write;

use anyhow::{Context, Result, bail};
use clap::Args;
use dl_core::{Activity, ActivityId, ActivityPatch};
use dl_db::Database;

use super::util::{Now, resolve_date};

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Task name; catalog names match case-insensitively, anything else is
    /// stored as free text.
    pub task: String,
    /// Start time, e.g. "9:00 AM". Defaults to now.
    #[arg(long)]
    pub start: Option<String>,
    /// End time. Not allowed for point-in-time tasks.
    #[arg(long)]
    pub end: Option<String>,
    /// Day to log against. Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Activity id, as printed by `dl show`.
    pub id: ActivityId,
    /// New task name.
    #[arg(long)]
    pub task: Option<String>,
    /// New start time.
    #[arg(long)]
    pub start: Option<String>,
    /// New end time.
    #[arg(long, conflicts_with = "clear_end")]
    pub end: Option<String>,
    /// Drop the end time.
    #[arg(long)]
    pub clear_end: bool,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &LogArgs, now: Now) -> Result<()> {
    let date = resolve_date(args.date.as_deref(), now)?;
    let catalog = db.load_tasks().context("failed to load tasks")?;
    let mut days = db.load_days().context("failed to load days")?;

    let task = catalog.canonical_name(&args.task);
    let start = args
        .start
        .clone()
        .unwrap_or_else(|| now.clock().to_string());
    let id = days.next_activity_id(now.epoch_ms);

    let activity = Activity::new(id, task, &start, args.end.as_deref())?;
    catalog.check_activity(&activity)?;
    let line = describe(&activity);
    days.add_activity(date, activity)?;
    db.save_days(&days).context("failed to save days")?;

    tracing::info!(%id, %date, "activity logged");
    writeln!(writer, "Logged {line} on {date} (id {id})")?;
    Ok(())
}

pub fn edit<W: Write>(writer: &mut W, db: &Database, args: &EditArgs) -> Result<()> {
    let catalog = db.load_tasks().context("failed to load tasks")?;
    let mut days = db.load_days().context("failed to load days")?;

    let end_time = if args.clear_end {
        Some(None)
    } else {
        args.end.clone().map(Some)
    };
    let patch = ActivityPatch {
        task: args
            .task
            .as_deref()
            .map(|task| catalog.canonical_name(task).to_string()),
        start_time: args.start.clone(),
        end_time,
    };
    if patch.is_empty() {
        bail!("nothing to change: pass --task, --start, --end or --clear-end");
    }

    let line = describe(days.update_activity(args.id, &patch, &catalog)?);
    db.save_days(&days).context("failed to save days")?;

    tracing::info!(id = %args.id, "activity updated");
    writeln!(writer, "Updated {}: {line}", args.id)?;
    Ok(())
}

pub fn remove<W: Write>(writer: &mut W, db: &Database, id: ActivityId) -> Result<()> {
    let mut days = db.load_days().context("failed to load days")?;
    let removed = days.remove_activity(id)?;
    db.save_days(&days).context("failed to save days")?;

    tracing::info!(%id, "activity removed");
    writeln!(writer, "Removed {} (id {id})", describe(&removed))?;
    Ok(())
}

fn describe(activity: &Activity) -> String {
    match &activity.end_time {
        Some(end) => format!("{} {} - {end}", activity.task, activity.start_time),
        None => format!("{} at {}", activity.task, activity.start_time),
    }
}
