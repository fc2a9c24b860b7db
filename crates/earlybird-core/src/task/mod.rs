//! Assignment tasks as the engine sees them.
//!
//! A [`TaskRecord`] is the loose shape the assignment store hands out (ISO
//! strings, camelCase keys). [`TaskRecord::into_task`] normalizes it into a
//! [`Task`], whose instants are already parsed.

use serde::{Deserialize, Serialize};

use crate::clock::{to_instant, Instant};
use crate::error::{CoreError, EngineError, ValidationError};
use crate::progress::window_millis;

/// Coin value the assignment store assigns when none is given.
pub const DEFAULT_BASE_REWARD: u64 = 10;

/// An assignment with a start/deadline window.
///
/// Values are immutable snapshots: operations that "change" a task, such as
/// [`Task::complete`], return a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    pub start: Instant,
    pub deadline: Instant,
    pub base_reward: u64,
    /// Present iff the task is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Instant>,
}

impl Task {
    /// An open task with no title.
    pub fn new(id: impl Into<String>, start: Instant, deadline: Instant, base_reward: u64) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            course: None,
            start,
            deadline,
            base_reward,
            completed_at: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_course(mut self, course: impl Into<String>) -> Self {
        self.course = Some(course.into());
        self
    }

    /// Builder form of completion; does not check prior state.
    pub fn with_completion(mut self, at: Instant) -> Self {
        self.completed_at = Some(at);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Completed strictly before the deadline.
    pub fn is_early(&self) -> bool {
        self.completed_at.is_some_and(|at| at < self.deadline)
    }

    /// Check the window is usable by the engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DegenerateWindow`] unless `deadline > start`.
    pub fn validate_window(&self) -> Result<(), EngineError> {
        window_millis(self.start, self.deadline).map(|_| ())
    }

    /// Mark the task completed at `at`, returning the completed copy.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::AlreadyCompleted`] if the task is already done.
    pub fn complete(&self, at: Instant) -> Result<Task, ValidationError> {
        if self.is_completed() {
            return Err(ValidationError::AlreadyCompleted {
                task_id: self.id.clone(),
            });
        }
        Ok(self.clone().with_completion(at))
    }
}

/// Task identifiers arrive as integers from the store and as strings from
/// hand-written files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

/// Raw task as supplied by the assignment store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    pub start_date: String,
    pub deadline: String,
    /// Absent in older records; filled from the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coins_reward: Option<u64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<String>,
}

impl TaskRecord {
    /// Parse dates and check completion consistency.
    ///
    /// Degenerate windows pass through; the engine reports them when it
    /// needs the window.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidDate`] for an unparseable date,
    /// [`ValidationError::InconsistentCompletion`] when `completed` and
    /// `completedDate` disagree.
    pub fn into_task(self) -> Result<Task, CoreError> {
        self.into_task_with_default(DEFAULT_BASE_REWARD)
    }

    /// As [`TaskRecord::into_task`], pricing records without `coinsReward`
    /// at `default_base_reward`.
    ///
    /// # Errors
    ///
    /// As [`TaskRecord::into_task`].
    pub fn into_task_with_default(self, default_base_reward: u64) -> Result<Task, CoreError> {
        let id = self.id.to_string();
        let start = to_instant(&self.start_date)?;
        let deadline = to_instant(&self.deadline)?;

        let completed_at = match (self.completed, self.completed_date.as_deref()) {
            (true, Some(date)) => Some(to_instant(date)?),
            (false, None) => None,
            _ => {
                return Err(ValidationError::InconsistentCompletion { task_id: id }.into());
            }
        };

        Ok(Task {
            id,
            title: self.title,
            course: self.course,
            start,
            deadline,
            base_reward: self.coins_reward.unwrap_or(default_base_reward),
            completed_at,
        })
    }
}

/// Ingest a JSON array of task records.
///
/// # Errors
///
/// Fails on malformed JSON or on the first record that does not validate.
pub fn tasks_from_json(json: &str) -> Result<Vec<Task>, CoreError> {
    tasks_from_json_with_default(json, DEFAULT_BASE_REWARD)
}

/// Ingest task records, using `default_base_reward` where a record has no
/// `coinsReward`.
///
/// # Errors
///
/// As [`tasks_from_json`].
pub fn tasks_from_json_with_default(
    json: &str,
    default_base_reward: u64,
) -> Result<Vec<Task>, CoreError> {
    let records: Vec<TaskRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .map(|r| r.into_task_with_default(default_base_reward))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(json: &str) -> TaskRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn record_with_store_shape_ingests() {
        let task = record(
            r#"{
                "id": 7,
                "title": "Lab report",
                "course": "CHEM 101",
                "startDate": "2024-03-01T09:00:00",
                "deadline": "2024-03-08T09:00:00",
                "coinsReward": 25,
                "completed": true,
                "completedDate": "2024-03-02T09:00:00"
            }"#,
        )
        .into_task()
        .unwrap();

        assert_eq!(task.id, "7");
        assert_eq!(task.course.as_deref(), Some("CHEM 101"));
        assert_eq!(task.base_reward, 25);
        assert_eq!(task.deadline - task.start, Duration::days(7).num_milliseconds());
        assert!(task.is_completed());
        assert!(task.is_early());
    }

    #[test]
    fn missing_reward_defaults_to_store_default() {
        let task = record(r#"{"id": "x", "startDate": "2024-03-01", "deadline": "2024-03-02"}"#)
            .into_task()
            .unwrap();
        assert_eq!(task.base_reward, DEFAULT_BASE_REWARD);
        assert!(!task.is_completed());
    }

    #[test]
    fn configured_default_applies_only_to_records_without_reward() {
        let json = r#"[
            {"id": 1, "startDate": "2024-03-01", "deadline": "2024-03-05"},
            {"id": 2, "startDate": "2024-03-01", "deadline": "2024-03-05", "coinsReward": 30}
        ]"#;
        let tasks = tasks_from_json_with_default(json, 100).unwrap();
        assert_eq!(tasks[0].base_reward, 100);
        assert_eq!(tasks[1].base_reward, 30);
    }

    #[test]
    fn unparseable_date_is_reported() {
        let err = record(r#"{"id": 1, "startDate": "soon", "deadline": "2024-03-02"}"#)
            .into_task()
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Engine(EngineError::InvalidDate { ref input }) if input == "soon"
        ));
    }

    #[test]
    fn completion_flag_and_date_must_agree() {
        let completed_without_date = record(
            r#"{"id": 1, "startDate": "2024-03-01", "deadline": "2024-03-02", "completed": true}"#,
        );
        let date_without_completion = record(
            r#"{"id": 2, "startDate": "2024-03-01", "deadline": "2024-03-02", "completedDate": "2024-03-01"}"#,
        );

        for rec in [completed_without_date, date_without_completion] {
            let err = rec.into_task().unwrap_err();
            assert!(matches!(
                err,
                CoreError::Validation(ValidationError::InconsistentCompletion { .. })
            ));
        }
    }

    #[test]
    fn degenerate_window_survives_ingestion() {
        let task = record(r#"{"id": 1, "startDate": "2024-03-01", "deadline": "2024-03-01"}"#)
            .into_task()
            .unwrap();
        assert!(matches!(
            task.validate_window(),
            Err(EngineError::DegenerateWindow { .. })
        ));
    }

    #[test]
    fn complete_returns_new_value_and_leaves_input() {
        let start = to_instant("2024-03-01").unwrap();
        let open = Task::new("a", start, start + Duration::days(3), 10);
        let done = open.complete(start + Duration::days(1)).unwrap();

        assert!(!open.is_completed());
        assert_eq!(done.completed_at, Some(start + Duration::days(1)));
        assert_eq!(
            done.complete(start).unwrap_err(),
            ValidationError::AlreadyCompleted {
                task_id: "a".into()
            }
        );
    }

    #[test]
    fn completion_at_deadline_is_not_early() {
        let start = to_instant("2024-03-01").unwrap();
        let deadline = start + Duration::days(3);
        let task = Task::new("a", start, deadline, 10).with_completion(deadline);
        assert!(!task.is_early());
    }

    #[test]
    fn tasks_from_json_stops_at_first_bad_record() {
        let json = r#"[
            {"id": 1, "startDate": "2024-03-01", "deadline": "2024-03-05"},
            {"id": 2, "startDate": "2024-03-01", "deadline": "never"}
        ]"#;
        assert!(tasks_from_json(json).is_err());

        let ok = r#"[{"id": 1, "startDate": "2024-03-01", "deadline": "2024-03-05"}]"#;
        assert_eq!(tasks_from_json(ok).unwrap().len(), 1);
    }
}
