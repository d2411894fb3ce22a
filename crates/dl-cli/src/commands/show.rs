//! Day views: `show`, `days` and `delete-day`.

use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Args;
use dl_core::{Day, DaySummary, TaskCatalog, format_duration, summarize_day};
use dl_db::Database;
use serde::Serialize;

use super::util::{Now, parse_date, resolve_date};

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Day to show. Defaults to today.
    #[arg(long)]
    pub date: Option<String>,
    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ShowOutput {
    date: NaiveDate,
    #[serde(flatten)]
    summary: DaySummary,
}

#[derive(Serialize)]
struct DayRow {
    date: NaiveDate,
    activities: usize,
    total_minutes: u32,
}

pub fn run<W: Write>(writer: &mut W, db: &Database, args: &ShowArgs, now: Now) -> Result<()> {
    let date = resolve_date(args.date.as_deref(), now)?;
    let catalog = db.load_tasks().context("failed to load tasks")?;
    let days = db.load_days().context("failed to load days")?;
    let day = days.get(date).cloned().unwrap_or_else(|| Day::new(date));
    let summary = summarize_day(&day, &catalog);

    if args.json {
        let output = ShowOutput { date, summary };
        writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    writeln!(writer, "{}", date.format("%Y-%m-%d (%a)"))?;
    if summary.activities.is_empty() {
        writeln!(writer, "  Nothing logged.")?;
        return Ok(());
    }
    write_activities(writer, &summary)?;
    writeln!(writer)?;
    write_totals(writer, &summary, &catalog)?;
    Ok(())
}

fn write_activities<W: Write>(writer: &mut W, summary: &DaySummary) -> Result<()> {
    for line in &summary.activities {
        let activity = &line.activity;
        let end = activity.end_time.as_deref().unwrap_or("-");
        writeln!(
            writer,
            "  {:>8}  {:>8}  {:>7}  {}  #{}",
            activity.start_time,
            end,
            line.duration,
            activity.task,
            activity.id
        )?;
    }
    Ok(())
}

fn write_totals<W: Write>(writer: &mut W, summary: &DaySummary, catalog: &TaskCatalog) -> Result<()> {
    writeln!(
        writer,
        "Tracked {}, productive {} ({:.0}%), span {}",
        format_duration(summary.total_minutes),
        format_duration(summary.productive_minutes),
        summary.productivity_ratio * 100.0,
        format_duration(summary.span_minutes)
    )?;
    for total in &summary.by_task {
        let marker = if catalog.is_productive(&total.task) {
            "*"
        } else {
            " "
        };
        writeln!(
            writer,
            "  {marker} {:<12} {}",
            total.task,
            format_duration(total.minutes)
        )?;
    }
    if summary.unparseable > 0 {
        writeln!(
            writer,
            "{} activities have unreadable times and count as 0m.",
            summary.unparseable
        )?;
    }
    Ok(())
}

/// Lists every stored day with its activity count and tracked time.
pub fn days<W: Write>(writer: &mut W, db: &Database, json: bool) -> Result<()> {
    let catalog = db.load_tasks().context("failed to load tasks")?;
    let days = db.load_days().context("failed to load days")?;

    let rows: Vec<DayRow> = days
        .days()
        .map(|day| DayRow {
            date: day.date,
            activities: day.activities.len(),
            total_minutes: summarize_day(day, &catalog).total_minutes,
        })
        .collect();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }

    if rows.is_empty() {
        writeln!(writer, "No days logged yet.")?;
        return Ok(());
    }
    for row in rows {
        let noun = if row.activities == 1 {
            "activity"
        } else {
            "activities"
        };
        writeln!(
            writer,
            "{}  {:>3} {:<10}  {}",
            row.date.format("%Y-%m-%d (%a)"),
            row.activities,
            noun,
            format_duration(row.total_minutes)
        )?;
    }
    Ok(())
}

pub fn delete_day<W: Write>(writer: &mut W, db: &Database, date: &str, now: Now) -> Result<()> {
    let date = parse_date(date, now.today())?;
    let mut days = db.load_days().context("failed to load days")?;
    let Some(removed) = days.delete_day(date) else {
        bail!("no record for {date}");
    };
    db.save_days(&days).context("failed to save days")?;

    tracing::info!(%date, activities = removed.activities.len(), "day deleted");
    writeln!(
        writer,
        "Deleted {date} ({} activities)",
        removed.activities.len()
    )?;
    Ok(())
}
