//! The user-extensible task catalog.

use serde::{Deserialize, Serialize};

use crate::model::Activity;
use crate::types::{ValidationError, non_empty};

/// A task the user can log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDef {
    pub name: String,
    /// Logged without an end time and never accrues duration.
    #[serde(default)]
    pub point_in_time: bool,
    /// Counts toward the productivity ratio.
    #[serde(default)]
    pub productive: bool,
}

impl TaskDef {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: non_empty(name, "task name")?,
            point_in_time: false,
            productive: false,
        })
    }

    #[must_use]
    pub const fn point_in_time(mut self) -> Self {
        self.point_in_time = true;
        self
    }

    #[must_use]
    pub const fn productive(mut self) -> Self {
        self.productive = true;
        self
    }
}

/// Task definitions, unique by case-insensitive name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCatalog {
    tasks: Vec<TaskDef>,
}

const DEFAULT_TASKS: &[(&str, bool, bool)] = &[
    ("Wake up", true, false),
    ("Sleep", true, false),
    ("Work", false, true),
    ("Study", false, true),
    ("Exercise", false, true),
    ("Reading", false, true),
    ("Breakfast", false, false),
    ("Lunch", false, false),
    ("Dinner", false, false),
    ("Break", false, false),
    ("Commute", false, false),
];

impl Default for TaskCatalog {
    fn default() -> Self {
        let tasks = DEFAULT_TASKS
            .iter()
            .map(|&(name, point_in_time, productive)| TaskDef {
                name: name.to_string(),
                point_in_time,
                productive,
            })
            .collect();
        Self { tasks }
    }
}

impl TaskCatalog {
    /// A catalog with no tasks at all.
    #[must_use]
    pub const fn empty() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskDef> {
        self.tasks.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks a task up by name, ignoring case and surrounding whitespace.
    pub fn get(&self, name: &str) -> Option<&TaskDef> {
        let name = name.trim();
        self.tasks
            .iter()
            .find(|task| task.name.eq_ignore_ascii_case(name))
    }

    pub fn add(&mut self, task: TaskDef) -> Result<&TaskDef, ValidationError> {
        if self.get(&task.name).is_some() {
            return Err(ValidationError::Duplicate {
                kind: "task",
                name: task.name,
            });
        }
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn remove(&mut self, name: &str) -> Result<TaskDef, ValidationError> {
        let name = name.trim();
        let index = self
            .tasks
            .iter()
            .position(|task| task.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ValidationError::NotFound {
                kind: "task",
                name: name.to_string(),
            })?;
        Ok(self.tasks.remove(index))
    }

    /// Whether `name` is a point-in-time task. Unknown names are not.
    pub fn is_point_in_time(&self, name: &str) -> bool {
        self.get(name).is_some_and(|task| task.point_in_time)
    }

    /// Whether `name` counts as productive. Unknown names do not.
    pub fn is_productive(&self, name: &str) -> bool {
        self.get(name).is_some_and(|task| task.productive)
    }

    /// The catalog's spelling of `name`, or `name` itself (trimmed) when it
    /// is free text.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).map_or_else(|| name.trim(), |task| task.name.as_str())
    }

    /// Rejects an end time on a point-in-time task.
    pub fn check_activity(&self, activity: &Activity) -> Result<(), ValidationError> {
        if activity.end_time.is_some() && self.is_point_in_time(&activity.task) {
            return Err(ValidationError::PointInTimeWithEnd {
                task: activity.task.clone(),
            });
        }
        Ok(())
    }
}
