//! Gemini-backed commands: `suggest`, `summarize` and `insights`.
//!
//! These only read stored data. A failed request is reported as an error and
//! leaves the database untouched.

use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use clap::Args;
use dl_core::{Day, DayLog};
use dl_db::Database;
use dl_llm::Client;

use super::util::Now;
use crate::Config;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Days of history to send. Defaults to `history_days` from the config.
    #[arg(long)]
    pub days: Option<u32>,
}

fn client(config: &Config) -> Result<Client> {
    let key = config.api_key().ok_or_else(|| {
        anyhow!("missing Gemini API key (set DL_API_KEY, GEMINI_API_KEY or config.toml)")
    })?;
    let client = Client::new(key)
        .context("failed to create Gemini client")?
        .with_base_url(&config.api_base_url)
        .with_model(&config.model);
    Ok(client)
}

fn history(days: &DayLog, count: u32, now: Now) -> Vec<&Day> {
    days.recent(count, now.today())
        .filter(|day| !day.is_empty())
        .collect()
}

/// Asks for the task the user is most likely doing right now.
#[allow(clippy::future_not_send)] // Database uses RefCell internally
pub async fn suggest<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    now: Now,
) -> Result<()> {
    let client = client(config)?;
    let catalog = db.load_tasks().context("failed to load tasks")?;
    let days = db.load_days().context("failed to load days")?;
    let history = history(&days, config.history_days, now);
    tracing::debug!(days = history.len(), "requesting task suggestion");

    let task = client
        .suggest_next_task(&history, &catalog, now.local)
        .await
        .context("suggestion request failed")?;

    writeln!(writer, "Suggested: {task}")?;
    writeln!(writer, "Log it with: dl log \"{task}\"")?;
    Ok(())
}

#[allow(clippy::future_not_send)] // Database uses RefCell internally
pub async fn summarize<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    args: &HistoryArgs,
    now: Now,
) -> Result<()> {
    let client = client(config)?;
    let count = args.days.unwrap_or(config.history_days);
    let days = db.load_days().context("failed to load days")?;
    let history = history(&days, count, now);
    if history.is_empty() {
        bail!("nothing logged in the last {count} days");
    }

    let summary = client
        .summarize(&history)
        .await
        .context("summary request failed")?;
    writeln!(writer, "{summary}")?;
    Ok(())
}

#[allow(clippy::future_not_send)] // Database uses RefCell internally
pub async fn insights<W: Write>(
    writer: &mut W,
    db: &Database,
    config: &Config,
    args: &HistoryArgs,
    now: Now,
) -> Result<()> {
    let client = client(config)?;
    let count = args.days.unwrap_or(config.history_days);
    let days = db.load_days().context("failed to load days")?;
    let goals = db.load_goals().context("failed to load goals")?;
    let history = history(&days, count, now);
    if history.is_empty() && goals.is_empty() {
        bail!("nothing logged in the last {count} days and no goals set");
    }

    let insights = client
        .suggest_insights(&history, &goals)
        .await
        .context("insights request failed")?;
    if insights.is_empty() {
        writeln!(writer, "No insights right now.")?;
    }
    for insight in insights {
        writeln!(writer, "- {insight}")?;
    }
    Ok(())
}
