//! Reminder command: one check, or a loop that keeps checking.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use dl_core::{Reminder, check_reminder};
use dl_db::Database;
use tokio::time::MissedTickBehavior;

use super::util::Now;

fn pending(db: &Database, threshold_minutes: u32, now: Now) -> Result<Option<Reminder>> {
    let days = db.load_days().context("failed to load days")?;
    Ok(check_reminder(
        days.get(now.today()),
        now.local.time(),
        threshold_minutes,
    ))
}

pub fn run<W: Write>(writer: &mut W, db: &Database, threshold_minutes: u32, now: Now) -> Result<()> {
    match pending(db, threshold_minutes, now)? {
        Some(reminder) => writeln!(writer, "{reminder}")?,
        None => writeln!(writer, "All caught up.")?,
    }
    Ok(())
}

/// Checks every `interval_minutes` and prints each reminder that fires.
///
/// The first check happens immediately. Runs until the process is stopped.
#[allow(clippy::future_not_send)] // Database uses RefCell internally
pub async fn watch<W, F>(
    writer: &mut W,
    db: &Database,
    threshold_minutes: u32,
    interval_minutes: u32,
    clock: F,
) -> Result<()>
where
    W: Write,
    F: Fn() -> Now,
{
    let period = Duration::from_secs(u64::from(interval_minutes.max(1)) * 60);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tracing::info!(interval_minutes, threshold_minutes, "watching for quiet periods");

    loop {
        ticker.tick().await;
        let now = clock();
        match pending(db, threshold_minutes, now)? {
            Some(reminder) => {
                tracing::debug!(?reminder, "reminder fired");
                writeln!(writer, "[{}] {reminder}", now.clock())?;
                writer.flush()?;
            }
            None => tracing::debug!("nothing to remind"),
        }
    }
}
