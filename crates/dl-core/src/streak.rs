//! Consecutive-day streaks over the day log.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::model::Day;

/// Current and longest runs of consecutive qualifying dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub current: u32,
    pub longest: u32,
}

/// Computes streaks for days containing `task`, or for every day when
/// `task` is `None`.
///
/// The current streak is alive only while the most recent qualifying date is
/// `today` or the day before. `today` must be on the same calendar basis the
/// days were filed under.
pub fn compute_streaks<'a, I>(days: I, task: Option<&str>, today: NaiveDate) -> Streaks
where
    I: IntoIterator<Item = &'a Day>,
{
    let dates: BTreeSet<NaiveDate> = days
        .into_iter()
        .filter(|day| task.is_none_or(|task| day.has_task(task)))
        .map(|day| day.date)
        .collect();
    let dates: Vec<NaiveDate> = dates.into_iter().collect();

    let Some(&latest) = dates.last() else {
        return Streaks::default();
    };

    let mut longest = 1;
    let mut run = 1;
    for pair in dates.windows(2) {
        if is_next_day(pair[0], pair[1]) {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 1;
        }
    }

    let alive = latest == today || latest == today - Duration::days(1);
    let current = if alive {
        let chained = dates
            .windows(2)
            .rev()
            .take_while(|pair| is_next_day(pair[0], pair[1]))
            .count();
        u32::try_from(chained).map_or(u32::MAX, |n| n + 1)
    } else {
        0
    };

    tracing::debug!(task, current, longest, dates = dates.len(), "computed streaks");
    Streaks { current, longest }
}

fn is_next_day(earlier: NaiveDate, later: NaiveDate) -> bool {
    (later - earlier).num_days() == 1
}
