//! Weekly goal management and progress.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Subcommand;
use dl_core::goal::{add_goal, remove_goal};
use dl_core::{Goal, GoalProgress, goal_progress, week_bounds};
use dl_db::Database;

use super::util::Now;

#[derive(Debug, Subcommand)]
pub enum GoalAction {
    /// List goals.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Set a weekly goal for a task.
    Add {
        /// Task the goal tracks.
        task: String,
        /// Days per week the task should appear.
        frequency: u32,
    },
    /// Remove the goal for a task.
    Remove {
        /// Task the goal tracks.
        task: String,
    },
    /// Show progress for the current Monday to Sunday week.
    Progress {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

pub fn run<W: Write>(writer: &mut W, db: &Database, action: &GoalAction, now: Now) -> Result<()> {
    let mut goals = db.load_goals().context("failed to load goals")?;
    match action {
        GoalAction::List { json } => {
            if *json {
                writeln!(writer, "{}", serde_json::to_string_pretty(&goals)?)?;
            } else if goals.is_empty() {
                writeln!(writer, "No goals set.")?;
            } else {
                for goal in &goals {
                    writeln!(
                        writer,
                        "{:<12} {}x per {}",
                        goal.task, goal.frequency, goal.period
                    )?;
                }
            }
            Ok(())
        }
        GoalAction::Add { task, frequency } => {
            let catalog = db.load_tasks().context("failed to load tasks")?;
            let goal = Goal::weekly(catalog.canonical_name(task), *frequency)?;
            let line = format!("{} {}x per {}", goal.task, goal.frequency, goal.period);
            add_goal(&mut goals, goal)?;
            db.save_goals(&goals).context("failed to save goals")?;
            tracing::info!(task = %task, frequency, "goal added");
            writeln!(writer, "Added goal: {line}")?;
            Ok(())
        }
        GoalAction::Remove { task } => {
            let removed = remove_goal(&mut goals, task)?;
            db.save_goals(&goals).context("failed to save goals")?;
            tracing::info!(task = %removed.task, "goal removed");
            writeln!(writer, "Removed goal for {}", removed.task)?;
            Ok(())
        }
        GoalAction::Progress { json } => progress(writer, db, &goals, *json, now),
    }
}

fn progress<W: Write>(
    writer: &mut W,
    db: &Database,
    goals: &[Goal],
    json: bool,
    now: Now,
) -> Result<()> {
    let days = db.load_days().context("failed to load days")?;
    let today = now.today();
    let report: Vec<GoalProgress> = goals
        .iter()
        .map(|goal| goal_progress(goal, days.days(), today))
        .collect();

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }
    if report.is_empty() {
        writeln!(writer, "No goals set.")?;
        return Ok(());
    }

    let (monday, sunday) = week_bounds(today);
    writeln!(writer, "Week of {monday} to {sunday}")?;
    for entry in &report {
        let status = if entry.met {
            "done".to_string()
        } else {
            format!("{} to go", entry.remaining)
        };
        writeln!(
            writer,
            "{:<12} {}/{}  {status}",
            entry.goal.task, entry.completed, entry.target
        )?;
    }
    Ok(())
}
