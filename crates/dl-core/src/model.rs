//! Days and the activities logged against them.
//!
//! [`DayLog`] is keyed by calendar date, so two [`Day`] records can never
//! share a date. On the wire it is a JSON array of days in date order.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::catalog::TaskCatalog;
use crate::clock::ClockTime;
use crate::types::{ActivityId, ValidationError, non_empty};

/// One logged action within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub task: String,
    /// 12-hour clock string, e.g. `"7:05 AM"`.
    pub start_time: String,
    /// `None` for point-in-time tasks.
    #[serde(default)]
    pub end_time: Option<String>,
}

impl Activity {
    /// Creates an activity after validating the task label and both times.
    ///
    /// Times are stored in their canonical form (`"7:05 AM"`).
    pub fn new(
        id: ActivityId,
        task: &str,
        start_time: &str,
        end_time: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let task = non_empty(task, "task")?;
        let start = parse_field(start_time, "start time")?;
        let end = end_time
            .map(|end| parse_field(end, "end time"))
            .transpose()?;
        Ok(Self {
            id,
            task,
            start_time: start.to_string(),
            end_time: end.map(|end| end.to_string()),
        })
    }

    /// Parsed start time, or `None` when the stored string is malformed.
    pub fn start(&self) -> Option<ClockTime> {
        ClockTime::parse(&self.start_time).ok()
    }

    pub fn end(&self) -> Option<ClockTime> {
        self.end_time
            .as_deref()
            .and_then(|end| ClockTime::parse(end).ok())
    }
}

fn parse_field(value: &str, field: &'static str) -> Result<ClockTime, ValidationError> {
    ClockTime::parse(value).map_err(|source| ValidationError::Clock { field, source })
}

/// Changes to apply to an existing activity. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    pub task: Option<String>,
    pub start_time: Option<String>,
    /// `Some(None)` clears the end time.
    pub end_time: Option<Option<String>>,
}

impl ActivityPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.task.is_none() && self.start_time.is_none() && self.end_time.is_none()
    }

    /// Returns the patched copy of `activity`, validated like a new one.
    pub fn apply(&self, activity: &Activity) -> Result<Activity, ValidationError> {
        let task = self.task.as_deref().unwrap_or(&activity.task);
        let start = self.start_time.as_deref().unwrap_or(&activity.start_time);
        let end = match &self.end_time {
            Some(end) => end.as_deref(),
            None => activity.end_time.as_deref(),
        };
        Activity::new(activity.id, task, start, end)
    }
}

/// All activities logged against one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl Day {
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            activities: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Activities ordered by parsed start time.
    ///
    /// Unparseable starts go last; equal keys keep insertion order.
    pub fn sorted_activities(&self) -> Vec<&Activity> {
        let mut sorted: Vec<&Activity> = self.activities.iter().collect();
        sorted.sort_by_key(|activity| match activity.start() {
            Some(start) => (false, start.minutes_since_midnight()),
            None => (true, 0),
        });
        sorted
    }

    /// The activity with the latest parseable start time.
    pub fn latest_activity(&self) -> Option<&Activity> {
        self.sorted_activities()
            .into_iter()
            .rev()
            .find(|activity| activity.start().is_some())
    }

    /// Whether any activity's task equals `task` exactly.
    pub fn has_task(&self, task: &str) -> bool {
        self.activities.iter().any(|activity| activity.task == task)
    }
}

/// The collection of days, keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Day>", into = "Vec<Day>")]
pub struct DayLog {
    days: BTreeMap<NaiveDate, Day>,
}

impl DayLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Day> {
        self.days.get(&date)
    }

    /// Returns the day for `date`, creating an empty one if needed.
    pub fn get_or_create(&mut self, date: NaiveDate) -> &mut Day {
        self.days.entry(date).or_insert_with(|| Day::new(date))
    }

    /// Days in ascending date order.
    pub fn days(&self) -> impl DoubleEndedIterator<Item = &Day> {
        self.days.values()
    }

    /// Days in the `count` calendar days ending at `today`, inclusive.
    pub fn recent(&self, count: u32, today: NaiveDate) -> impl Iterator<Item = &Day> {
        let first = if count == 0 {
            today + Duration::days(1)
        } else {
            today - Duration::days(i64::from(count) - 1)
        };
        self.days
            .range(first..)
            .take_while(move |(date, _)| **date <= today)
            .map(|(_, day)| day)
    }

    /// An id greater than every id in the log and no smaller than `now_ms`.
    pub fn next_activity_id(&self, now_ms: i64) -> ActivityId {
        let max = self
            .days
            .values()
            .flat_map(|day| &day.activities)
            .map(|activity| activity.id.value())
            .max();
        match max {
            Some(max) if max >= now_ms => ActivityId::new(max + 1),
            _ => ActivityId::new(now_ms),
        }
    }

    /// Appends `activity` to the day for `date`.
    pub fn add_activity(
        &mut self,
        date: NaiveDate,
        activity: Activity,
    ) -> Result<ActivityId, ValidationError> {
        if self.find_activity(activity.id).is_some() {
            return Err(ValidationError::Duplicate {
                kind: "activity",
                name: activity.id.to_string(),
            });
        }
        let id = activity.id;
        self.get_or_create(date).activities.push(activity);
        tracing::debug!(%date, %id, "activity added");
        Ok(id)
    }

    /// Finds an activity by id, returning the date it is logged under.
    pub fn find_activity(&self, id: ActivityId) -> Option<(NaiveDate, &Activity)> {
        self.days.values().find_map(|day| {
            day.activities
                .iter()
                .find(|activity| activity.id == id)
                .map(|activity| (day.date, activity))
        })
    }

    /// Replaces the stored activity with the same id, returning the old one.
    pub fn replace_activity(&mut self, activity: Activity) -> Result<Activity, ValidationError> {
        let slot = self
            .days
            .values_mut()
            .flat_map(|day| day.activities.iter_mut())
            .find(|existing| existing.id == activity.id)
            .ok_or_else(|| not_found(activity.id))?;
        Ok(std::mem::replace(slot, activity))
    }

    /// Applies `patch` to the activity with `id`.
    ///
    /// The log is left untouched when the patched activity fails validation
    /// or breaks a catalog rule.
    pub fn update_activity(
        &mut self,
        id: ActivityId,
        patch: &ActivityPatch,
        catalog: &TaskCatalog,
    ) -> Result<&Activity, ValidationError> {
        let (date, current) = self.find_activity(id).ok_or_else(|| not_found(id))?;
        let updated = patch.apply(current)?;
        catalog.check_activity(&updated)?;
        self.replace_activity(updated)?;
        self.days
            .get(&date)
            .and_then(|day| day.activities.iter().find(|activity| activity.id == id))
            .ok_or_else(|| not_found(id))
    }

    /// Removes the activity with `id`. The day itself stays, even if empty.
    pub fn remove_activity(&mut self, id: ActivityId) -> Result<Activity, ValidationError> {
        for day in self.days.values_mut() {
            if let Some(index) = day.activities.iter().position(|a| a.id == id) {
                return Ok(day.activities.remove(index));
            }
        }
        Err(not_found(id))
    }

    pub fn delete_day(&mut self, date: NaiveDate) -> Option<Day> {
        self.days.remove(&date)
    }
}

fn not_found(id: ActivityId) -> ValidationError {
    ValidationError::NotFound {
        kind: "activity",
        name: id.to_string(),
    }
}

impl From<Vec<Day>> for DayLog {
    fn from(days: Vec<Day>) -> Self {
        let mut log = Self::new();
        for day in days {
            match log.days.get_mut(&day.date) {
                Some(existing) => {
                    tracing::warn!(date = %day.date, "merging duplicate day record");
                    existing.activities.extend(day.activities);
                }
                None => {
                    log.days.insert(day.date, day);
                }
            }
        }
        log
    }
}

impl From<DayLog> for Vec<Day> {
    fn from(log: DayLog) -> Self {
        log.days.into_values().collect()
    }
}

impl FromIterator<Day> for DayLog {
    fn from_iter<I: IntoIterator<Item = Day>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn activity(id: i64, task: &str, start: &str, end: Option<&str>) -> Activity {
        Activity::new(ActivityId::new(id), task, start, end).unwrap()
    }

    #[test]
    fn activity_new_canonicalizes_times() {
        let a = activity(1, "  Work ", " 9:00 AM", Some("05:30 PM"));
        assert_eq!(a.task, "Work");
        assert_eq!(a.start_time, "9:00 AM");
        assert_eq!(a.end_time.as_deref(), Some("5:30 PM"));
    }

    #[test]
    fn activity_new_rejects_bad_input() {
        let id = ActivityId::new(1);
        assert!(matches!(
            Activity::new(id, " ", "9:00 AM", None),
            Err(ValidationError::Empty { field: "task" })
        ));
        assert!(matches!(
            Activity::new(id, "Work", "9:00", None),
            Err(ValidationError::Clock {
                field: "start time",
                ..
            })
        ));
        assert!(matches!(
            Activity::new(id, "Work", "9:00 AM", Some("noon")),
            Err(ValidationError::Clock {
                field: "end time",
                ..
            })
        ));
    }

    #[test]
    fn activity_json_uses_camel_case() {
        let a = activity(7, "Lunch", "12:00 PM", Some("12:45 PM"));
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "task": "Lunch",
                "startTime": "12:00 PM",
                "endTime": "12:45 PM"
            })
        );

        let point: Activity =
            serde_json::from_str(r#"{"id":8,"task":"Wake up","startTime":"6:30 AM"}"#).unwrap();
        assert_eq!(point.end_time, None);
    }

    #[test]
    fn sorted_activities_orders_by_parsed_start() {
        let mut day = Day::new(date("2025-01-01"));
        day.activities.push(activity(1, "Lunch", "12:00 PM", None));
        day.activities.push(Activity {
            id: ActivityId::new(2),
            task: "Broken".to_string(),
            start_time: "whenever".to_string(),
            end_time: None,
        });
        day.activities.push(activity(3, "Wake up", "6:30 AM", None));
        day.activities.push(activity(4, "Work", "9:00 AM", Some("11:00 AM")));

        let order: Vec<i64> = day
            .sorted_activities()
            .iter()
            .map(|a| a.id.value())
            .collect();
        assert_eq!(order, vec![3, 4, 1, 2]);
        assert_eq!(day.latest_activity().map(|a| a.id.value()), Some(1));
    }

    #[test]
    fn log_keeps_one_day_per_date() {
        let mut log = DayLog::new();
        let d = date("2025-01-02");
        log.add_activity(d, activity(1, "Work", "9:00 AM", None))
            .unwrap();
        log.add_activity(d, activity(2, "Lunch", "12:00 PM", None))
            .unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.get(d).unwrap().activities.len(), 2);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut log = DayLog::new();
        log.add_activity(date("2025-01-01"), activity(1, "Work", "9:00 AM", None))
            .unwrap();
        let err = log
            .add_activity(date("2025-01-02"), activity(1, "Lunch", "12:00 PM", None))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn next_id_is_monotonic() {
        let mut log = DayLog::new();
        assert_eq!(log.next_activity_id(100), ActivityId::new(100));
        log.add_activity(date("2025-01-01"), activity(500, "Work", "9:00 AM", None))
            .unwrap();
        assert_eq!(log.next_activity_id(100), ActivityId::new(501));
        assert_eq!(log.next_activity_id(900), ActivityId::new(900));
    }

    #[test]
    fn update_applies_patch_and_validates() {
        let mut log = DayLog::new();
        let id = log
            .add_activity(
                date("2025-01-01"),
                activity(1, "Work", "9:00 AM", Some("10:00 AM")),
            )
            .unwrap();

        let patch = ActivityPatch {
            task: Some("Study".to_string()),
            end_time: Some(None),
            ..ActivityPatch::default()
        };
        let catalog = TaskCatalog::default();
        let updated = log.update_activity(id, &patch, &catalog).unwrap();
        assert_eq!(updated.task, "Study");
        assert_eq!(updated.end_time, None);

        let bad = ActivityPatch {
            start_time: Some("9 AM".to_string()),
            ..ActivityPatch::default()
        };
        assert!(log.update_activity(id, &bad, &catalog).is_err());
        assert_eq!(log.find_activity(id).unwrap().1.start_time, "9:00 AM");

        let point_in_time = ActivityPatch {
            task: Some("Wake up".to_string()),
            end_time: Some(Some("9:30 AM".to_string())),
            ..ActivityPatch::default()
        };
        assert!(matches!(
            log.update_activity(id, &point_in_time, &catalog),
            Err(ValidationError::PointInTimeWithEnd { .. })
        ));
        assert_eq!(log.find_activity(id).unwrap().1.task, "Study");
    }

    #[test]
    fn remove_and_delete() {
        let mut log = DayLog::new();
        let d = date("2025-01-01");
        let id = log
            .add_activity(d, activity(1, "Work", "9:00 AM", None))
            .unwrap();
        assert_eq!(log.remove_activity(id).unwrap().task, "Work");
        assert!(log.remove_activity(id).is_err());
        assert!(log.get(d).unwrap().is_empty());
        assert!(log.delete_day(d).is_some());
        assert!(log.delete_day(d).is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn deserializing_merges_duplicate_dates() {
        let json = r#"[
            {"date":"2025-01-02","activities":[{"id":1,"task":"Work","startTime":"9:00 AM","endTime":null}]},
            {"date":"2025-01-01","activities":[]},
            {"date":"2025-01-02","activities":[{"id":2,"task":"Lunch","startTime":"12:00 PM"}]}
        ]"#;
        let log: DayLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.len(), 2);
        let dates: Vec<String> = log.days().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2025-01-01", "2025-01-02"]);
        assert_eq!(log.get(date("2025-01-02")).unwrap().activities.len(), 2);
    }

    #[test]
    fn serializes_as_sorted_array() {
        let log: DayLog = vec![Day::new(date("2025-03-02")), Day::new(date("2025-03-01"))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(
            json,
            r#"[{"date":"2025-03-01","activities":[]},{"date":"2025-03-02","activities":[]}]"#
        );
    }

    #[test]
    fn recent_selects_trailing_window() {
        let log: DayLog = ["2025-01-01", "2025-01-05", "2025-01-06", "2025-01-08"]
            .into_iter()
            .map(|d| Day::new(date(d)))
            .collect();
        let dates: Vec<String> = log
            .recent(3, date("2025-01-07"))
            .map(|d| d.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2025-01-05", "2025-01-06"]);
        assert_eq!(log.recent(0, date("2025-01-07")).count(), 0);
    }
}
