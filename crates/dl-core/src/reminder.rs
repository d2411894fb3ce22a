//! Nudges for a day that has gone quiet.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

use crate::clock::ClockTime;
use crate::model::Day;

/// Minutes of silence after which a reminder fires.
pub const DEFAULT_THRESHOLD_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reminder {
    /// Nothing has been logged today.
    NothingLogged,
    /// The latest activity started too long ago.
    Stale { task: String, minutes_since: u32 },
}

impl fmt::Display for Reminder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingLogged => write!(f, "Nothing logged yet today. What are you up to?"),
            Self::Stale {
                task,
                minutes_since,
            } => write!(
                f,
                "Last entry was {task} {} ago. Time to log what you're doing?",
                crate::format_duration(*minutes_since)
            ),
        }
    }
}

/// Decides whether today's record warrants a reminder at `now`.
///
/// Starts later than `now` never trigger a reminder.
pub fn check_reminder(today: Option<&Day>, now: NaiveTime, threshold_minutes: u32) -> Option<Reminder> {
    let Some(day) = today.filter(|day| !day.is_empty()) else {
        return Some(Reminder::NothingLogged);
    };
    let latest = day.latest_activity()?;
    let start = latest.start()?;
    let now = ClockTime::from_naive_time(now);

    let elapsed = now
        .minutes_since_midnight()
        .checked_sub(start.minutes_since_midnight())?;
    (elapsed > threshold_minutes).then(|| Reminder::Stale {
        task: latest.task.clone(),
        minutes_since: elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Activity;
    use crate::types::ActivityId;
    use chrono::NaiveDate;

    fn day_with(starts: &[&str]) -> Day {
        let mut day = Day::new(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        for (i, start) in starts.iter().enumerate() {
            let id = ActivityId::new(i64::try_from(i).unwrap());
            day.activities
                .push(Activity::new(id, "Work", start, None).unwrap());
        }
        day
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 30).unwrap()
    }

    #[test]
    fn nothing_logged() {
        assert_eq!(
            check_reminder(None, at(10, 0), 60),
            Some(Reminder::NothingLogged)
        );
        assert_eq!(
            check_reminder(Some(&day_with(&[])), at(10, 0), 60),
            Some(Reminder::NothingLogged)
        );
    }

    #[test]
    fn stale_after_threshold() {
        let day = day_with(&["7:00 AM", "9:00 AM"]);
        assert_eq!(
            check_reminder(Some(&day), at(10, 1), 60),
            Some(Reminder::Stale {
                task: "Work".to_string(),
                minutes_since: 61
            })
        );
        assert_eq!(check_reminder(Some(&day), at(9, 59), 60), None);
        assert_eq!(check_reminder(Some(&day), at(10, 0), 60), None);
    }

    #[test]
    fn uses_latest_start_not_insertion_order() {
        let day = day_with(&["9:00 AM", "7:00 AM"]);
        assert_eq!(check_reminder(Some(&day), at(9, 30), 60), None);
    }

    #[test]
    fn future_start_is_quiet() {
        let day = day_with(&["11:00 PM"]);
        assert_eq!(check_reminder(Some(&day), at(8, 0), 60), None);
    }

    #[test]
    fn message_mentions_task_and_gap() {
        let reminder = Reminder::Stale {
            task: "Study".to_string(),
            minutes_since: 95,
        };
        assert_eq!(
            reminder.to_string(),
            "Last entry was Study 1h 35m ago. Time to log what you're doing?"
        );
    }
}
