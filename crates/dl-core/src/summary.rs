//! Per-day totals: tracked time, productive time, and the span of the day.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::TaskCatalog;
use crate::clock::minutes_between;
use crate::duration::{ActivityDuration, activity_duration};
use crate::model::{Activity, Day};

/// One row of a day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityLine {
    #[serde(flatten)]
    pub activity: Activity,
    pub duration: ActivityDuration,
}

/// Minutes spent on one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskTotal {
    pub task: String,
    pub minutes: u32,
}

/// Aggregates for a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub activities: Vec<ActivityLine>,
    pub total_minutes: u32,
    pub productive_minutes: u32,
    /// `productive_minutes / total_minutes`, 0 for a day with no tracked time.
    pub productivity_ratio: f64,
    pub by_task: Vec<TaskTotal>,
    /// From the first start to the latest end (or start) of the day.
    pub span_minutes: u32,
    pub unparseable: usize,
}

pub fn summarize_day(day: &Day, catalog: &TaskCatalog) -> DaySummary {
    let mut activities = Vec::with_capacity(day.activities.len());
    let mut totals: HashMap<&str, u32> = HashMap::new();
    let mut total_minutes = 0;
    let mut productive_minutes = 0;
    let mut unparseable = 0;

    let sorted = day.sorted_activities();
    for activity in &sorted {
        let duration = activity_duration(&activity.start_time, activity.end_time.as_deref());
        let minutes = duration.minutes();
        if duration.is_unparseable() {
            unparseable += 1;
        }
        total_minutes += minutes;
        if catalog.is_productive(&activity.task) {
            productive_minutes += minutes;
        }
        *totals.entry(activity.task.as_str()).or_default() += minutes;
        activities.push(ActivityLine {
            activity: (*activity).clone(),
            duration,
        });
    }

    let mut by_task: Vec<TaskTotal> = totals
        .into_iter()
        .map(|(task, minutes)| TaskTotal {
            task: task.to_string(),
            minutes,
        })
        .collect();
    by_task.sort_by(|a, b| b.minutes.cmp(&a.minutes).then_with(|| a.task.cmp(&b.task)));

    let productivity_ratio = if total_minutes == 0 {
        0.0
    } else {
        f64::from(productive_minutes) / f64::from(total_minutes)
    };

    DaySummary {
        activities,
        total_minutes,
        productive_minutes,
        productivity_ratio,
        by_task,
        span_minutes: day_span_minutes(&sorted),
        unparseable,
    }
}

/// Wall-clock span of a day from its earliest start to the furthest point
/// any activity reaches.
fn day_span_minutes(sorted: &[&Activity]) -> u32 {
    let Some(first) = sorted.iter().find_map(|activity| activity.start()) else {
        return 0;
    };
    sorted
        .iter()
        .filter_map(|activity| {
            let start = activity.start()?;
            let offset = minutes_between(first, start);
            let length = activity
                .end()
                .map_or(0, |end| minutes_between(start, end));
            Some(offset + length)
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActivityId;
    use chrono::NaiveDate;

    fn day(entries: &[(&str, &str, Option<&str>)]) -> Day {
        let mut day = Day::new(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        for (i, (task, start, end)) in entries.iter().enumerate() {
            let id = ActivityId::new(i64::try_from(i).unwrap());
            day.activities
                .push(Activity::new(id, task, start, *end).unwrap());
        }
        day
    }

    #[test]
    fn empty_day_has_zero_ratio() {
        let summary = summarize_day(&day(&[]), &TaskCatalog::default());
        assert_eq!(summary.total_minutes, 0);
        assert!(summary.productivity_ratio.abs() < f64::EPSILON);
        assert_eq!(summary.span_minutes, 0);
        assert!(summary.by_task.is_empty());
    }

    #[test]
    fn totals_and_ratio() {
        let summary = summarize_day(
            &day(&[
                ("Lunch", "12:00 PM", Some("1:00 PM")),
                ("Wake up", "7:00 AM", None),
                ("Work", "9:00 AM", Some("12:00 PM")),
                ("Work", "1:00 PM", Some("2:00 PM")),
            ]),
            &TaskCatalog::default(),
        );

        assert_eq!(summary.total_minutes, 300);
        assert_eq!(summary.productive_minutes, 240);
        assert!((summary.productivity_ratio - 0.8).abs() < 1e-9);
        assert_eq!(summary.span_minutes, 7 * 60);

        let order: Vec<&str> = summary
            .activities
            .iter()
            .map(|line| line.activity.task.as_str())
            .collect();
        assert_eq!(order, vec!["Wake up", "Work", "Lunch", "Work"]);
        assert_eq!(summary.activities[0].duration, ActivityDuration::PointInTime);

        assert_eq!(
            summary.by_task,
            vec![
                TaskTotal {
                    task: "Work".to_string(),
                    minutes: 240
                },
                TaskTotal {
                    task: "Lunch".to_string(),
                    minutes: 60
                },
                TaskTotal {
                    task: "Wake up".to_string(),
                    minutes: 0
                },
            ]
        );
    }

    #[test]
    fn span_follows_rollover() {
        let summary = summarize_day(
            &day(&[
                ("Work", "8:00 PM", Some("10:00 PM")),
                ("Reading", "10:30 PM", Some("12:30 AM")),
            ]),
            &TaskCatalog::default(),
        );
        assert_eq!(summary.total_minutes, 240);
        assert_eq!(summary.span_minutes, 270);
    }

    #[test]
    fn counts_unparseable_rows() {
        let mut d = day(&[("Work", "9:00 AM", Some("10:00 AM"))]);
        d.activities.push(Activity {
            id: ActivityId::new(99),
            task: "Work".to_string(),
            start_time: "9 AM".to_string(),
            end_time: Some("10:00 AM".to_string()),
        });
        let summary = summarize_day(&d, &TaskCatalog::default());
        assert_eq!(summary.unparseable, 1);
        assert_eq!(summary.total_minutes, 60);
        assert_eq!(
            summary.activities[1].duration,
            ActivityDuration::Unparseable
        );
    }
}
