use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::TaskError;

/// Date format used by the task store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Years a store date may carry. Anything outside is treated as malformed.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// Opaque task identifier, as handed out by the project store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh id for locally created tasks.
    pub fn generate() -> Self {
        Self(format!("tsk-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Execution state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "No Iniciado", alias = "not_started")]
    NotStarted,
    #[serde(alias = "En Progreso", alias = "in_progress")]
    InProgress,
    #[serde(alias = "Completado", alias = "completed")]
    Completed,
    #[serde(alias = "Retrasado", alias = "delayed")]
    Delayed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not started",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Delayed => "Delayed",
        }
    }
}

/// A task as exchanged with the store: dates are `YYYY-MM-DD` strings.
///
/// Keys are camelCase; the snake_case column names of the relational store are
/// accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "start_date", deserialize_with = "lenient_date")]
    pub start_date: String,
    #[serde(default, alias = "end_date", deserialize_with = "lenient_date")]
    pub end_date: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, alias = "total_volume", skip_serializing_if = "Option::is_none")]
    pub total_volume: Option<f64>,
    #[serde(default, alias = "completed_volume", skip_serializing_if = "Option::is_none")]
    pub completed_volume: Option<f64>,
    #[serde(default, alias = "depends_on")]
    pub depends_on: Vec<TaskId>,
    #[serde(default, alias = "is_extraordinary")]
    pub is_extraordinary: bool,
}

/// Keep a row decodable when its date column is null or not a string; the
/// value then fails date parsing and only that row is skipped.
fn lenient_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

impl TaskRecord {
    pub fn new(
        id: impl Into<TaskId>,
        name: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
            status: TaskStatus::NotStarted,
            total_volume: None,
            completed_volume: None,
            depends_on: Vec::new(),
            is_extraordinary: false,
        }
    }

    /// Overwrite both dates in store format.
    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) {
        self.start_date = start.format(DATE_FORMAT).to_string();
        self.end_date = end.format(DATE_FORMAT).to_string();
    }
}

/// A task with parsed dates, ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub status: TaskStatus,
    pub total_volume: Option<f64>,
    pub completed_volume: Option<f64>,
    pub depends_on: Vec<TaskId>,
    pub is_extraordinary: bool,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start,
            end,
            status: TaskStatus::NotStarted,
            total_volume: None,
            completed_volume: None,
            depends_on: Vec::new(),
            is_extraordinary: false,
        }
    }

    pub fn with_dependencies(mut self, deps: impl IntoIterator<Item = TaskId>) -> Self {
        self.depends_on = deps.into_iter().collect();
        self
    }

    /// Fraction of the bar to fill, from 0.0 to 1.0.
    ///
    /// Volumes win when a positive total is known; otherwise only a completed
    /// task counts as done.
    pub fn progress(&self) -> f32 {
        match self.total_volume {
            Some(total) if total > 0.0 => {
                let done = self.completed_volume.unwrap_or(0.0);
                (done / total).clamp(0.0, 1.0) as f32
            }
            _ if self.status == TaskStatus::Completed => 1.0,
            _ => 0.0,
        }
    }
}

impl TryFrom<&TaskRecord> for Task {
    type Error = TaskError;

    fn try_from(record: &TaskRecord) -> Result<Self, Self::Error> {
        let start = parse_date(record, "startDate", &record.start_date)?;
        let end = parse_date(record, "endDate", &record.end_date)?;
        if end < start {
            return Err(TaskError::EndBeforeStart {
                id: record.id.clone(),
            });
        }

        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            start,
            end,
            status: record.status,
            total_volume: record.total_volume,
            completed_volume: record.completed_volume,
            depends_on: record.depends_on.clone(),
            is_extraordinary: record.is_extraordinary,
        })
    }
}

fn parse_date(record: &TaskRecord, field: &'static str, value: &str) -> Result<NaiveDate, TaskError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .filter(|date| YEAR_RANGE.contains(&date.year()))
        .ok_or_else(|| TaskError::InvalidDate {
            id: record.id.clone(),
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn progress_prefers_volumes() {
        let mut task = Task::new("t1", "Losa", date(2024, 8, 1), date(2024, 8, 5));
        task.total_volume = Some(200.0);
        task.completed_volume = Some(50.0);
        task.status = TaskStatus::Completed;
        assert_eq!(task.progress(), 0.25);
    }

    #[test]
    fn progress_clamps_overreported_volume() {
        let mut task = Task::new("t1", "Losa", date(2024, 8, 1), date(2024, 8, 5));
        task.total_volume = Some(10.0);
        task.completed_volume = Some(12.0);
        assert_eq!(task.progress(), 1.0);
    }

    #[test]
    fn progress_falls_back_to_status() {
        let mut task = Task::new("t1", "Muros", date(2024, 8, 1), date(2024, 8, 5));
        assert_eq!(task.progress(), 0.0);
        task.status = TaskStatus::Completed;
        assert_eq!(task.progress(), 1.0);
        task.total_volume = Some(0.0);
        assert_eq!(task.progress(), 1.0);
    }

    #[test]
    fn record_accepts_snake_case_and_spanish_status() {
        let json = r#"{
            "id": "t9",
            "name": "Cimentación",
            "start_date": "2024-08-01",
            "end_date": "2024-08-09",
            "status": "En Progreso",
            "depends_on": ["t1"],
            "is_extraordinary": true
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        let task = Task::try_from(&record).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.depends_on, vec![TaskId::from("t1")]);
        assert!(task.is_extraordinary);
        assert_eq!(task.end, date(2024, 8, 9));
    }

    #[test]
    fn malformed_date_is_reported_with_field() {
        let mut record = TaskRecord::new("t1", "Losa", date(2024, 8, 1), date(2024, 8, 5));
        record.end_date = "2024-13-40".into();
        match Task::try_from(&record) {
            Err(TaskError::InvalidDate { field, .. }) => assert_eq!(field, "endDate"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let record = TaskRecord::new("t1", "Losa", date(2024, 8, 5), date(2024, 8, 1));
        assert!(matches!(
            Task::try_from(&record),
            Err(TaskError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn null_or_missing_dates_decode_and_fail_parsing() {
        let json = r#"[
            {"id": "t1", "name": "Losa", "startDate": null, "endDate": "2024-08-05"},
            {"id": "t2", "name": "Muros", "endDate": "2024-08-05"},
            {"id": "t3", "name": "Vigas", "startDate": 20240801, "endDate": "2024-08-05"}
        ]"#;
        let records: Vec<TaskRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].start_date, "");
        assert_eq!(records[1].start_date, "");
        assert_eq!(records[2].start_date, "20240801");
        for record in &records {
            assert!(matches!(
                Task::try_from(record),
                Err(TaskError::InvalidDate { field: "startDate", .. })
            ));
        }
    }

    #[test]
    fn years_outside_four_digits_are_rejected() {
        let mut record = TaskRecord::new("t1", "Losa", date(2024, 8, 1), date(2024, 8, 5));
        record.end_date = "+262142-12-31".into();
        assert!(matches!(
            Task::try_from(&record),
            Err(TaskError::InvalidDate { field: "endDate", .. })
        ));
        record.end_date = "9999-12-31".into();
        assert!(Task::try_from(&record).is_ok());
    }
}
