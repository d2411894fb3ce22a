//! Weekly frequency goals and progress against them.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::Day;
use crate::types::{ValidationError, non_empty};

/// The window a goal's frequency is counted over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    #[default]
    Week,
}

impl GoalPeriod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
        }
    }
}

impl fmt::Display for GoalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GoalPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(Self::Week),
            _ => Err(ValidationError::InvalidPeriod {
                value: s.to_string(),
            }),
        }
    }
}

/// "Do `task` on `frequency` distinct days per `period`."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub task: String,
    pub frequency: u32,
    #[serde(default)]
    pub period: GoalPeriod,
}

impl Goal {
    pub fn weekly(task: &str, frequency: u32) -> Result<Self, ValidationError> {
        if frequency == 0 {
            return Err(ValidationError::ZeroFrequency);
        }
        Ok(Self {
            task: non_empty(task, "goal task")?,
            frequency,
            period: GoalPeriod::Week,
        })
    }
}

/// Adds `goal` unless another goal already targets the same task.
pub fn add_goal(goals: &mut Vec<Goal>, goal: Goal) -> Result<(), ValidationError> {
    if goals
        .iter()
        .any(|existing| existing.task.eq_ignore_ascii_case(&goal.task))
    {
        return Err(ValidationError::Duplicate {
            kind: "goal",
            name: goal.task,
        });
    }
    goals.push(goal);
    Ok(())
}

pub fn remove_goal(goals: &mut Vec<Goal>, task: &str) -> Result<Goal, ValidationError> {
    let task = task.trim();
    let index = goals
        .iter()
        .position(|goal| goal.task.eq_ignore_ascii_case(task))
        .ok_or_else(|| ValidationError::NotFound {
            kind: "goal",
            name: task.to_string(),
        })?;
    Ok(goals.remove(index))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub goal: Goal,
    pub completed: u32,
    pub target: u32,
    pub remaining: u32,
    pub met: bool,
}

/// Monday and Sunday of the week containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// Counts distinct days this week with at least one activity for the goal's
/// task.
///
/// Task names match ignoring ASCII case and surrounding whitespace. Goals
/// are unique per task under the same rule, so a free-text entry such as
/// `"exercise"` counts toward the `Exercise` goal. Streaks stay exact (see
/// [`crate::compute_streaks`]); the CLI resolves their filter through the
/// catalog first.
pub fn goal_progress<'a, I>(goal: &Goal, days: I, today: NaiveDate) -> GoalProgress
where
    I: IntoIterator<Item = &'a Day>,
{
    let (monday, sunday) = week_bounds(today);
    let dates: BTreeSet<NaiveDate> = days
        .into_iter()
        .filter(|day| (monday..=sunday).contains(&day.date))
        .filter(|day| {
            day.activities
                .iter()
                .any(|activity| activity.task.trim().eq_ignore_ascii_case(&goal.task))
        })
        .map(|day| day.date)
        .collect();

    let completed = u32::try_from(dates.len()).unwrap_or(u32::MAX);
    GoalProgress {
        goal: goal.clone(),
        completed,
        target: goal.frequency,
        remaining: goal.frequency.saturating_sub(completed),
        met: completed >= goal.frequency,
    }
}
