//! Core types for the tasks API.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task priority, stored and transmitted by its symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Symbolic name used on the wire and in the `tasks.priority` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }

    /// Ordering rank (LOW < MEDIUM < HIGH).
    pub fn rank(&self) -> i32 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ApiError;

    /// Exact symbolic names only; `"high"` is rejected just like `"URGENT"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ApiError::invalid_argument(
                    "priority",
                    &format!("Unknown priority '{}', expected one of LOW, MEDIUM, HIGH", s),
                )
            })
    }
}

/// A task aggregate as persisted by the store.
///
/// `id` and `created_at` are `None` until the store assigns them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: Option<i64>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// A child work item owned by exactly one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: Option<i64>,
    pub task_id: Option<i64>,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: i32,
}

/// Client-supplied task representation for create and update.
///
/// Unknown fields (including `id` and `createdAt`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub priority: Priority,
    /// `None` leaves existing subtasks untouched on update; `Some(vec![])` removes them all.
    #[serde(default)]
    pub subtasks: Option<Vec<SubtaskPayload>>,
}

/// Client-supplied subtask representation.
///
/// An `id` that already belongs to the parent task updates that subtask;
/// anything else is inserted as a new subtask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtaskPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: i32,
}

impl TaskPayload {
    pub fn new(description: impl Into<String>, completed: bool, priority: Priority) -> Self {
        Self {
            description: Some(description.into()),
            completed,
            priority,
            subtasks: None,
        }
    }

    pub fn with_subtasks(mut self, subtasks: Vec<SubtaskPayload>) -> Self {
        self.subtasks = Some(subtasks);
        self
    }
}

impl SubtaskPayload {
    pub fn new(description: impl Into<String>, completed: bool, priority: i32) -> Self {
        Self {
            id: None,
            description: Some(description.into()),
            completed,
            priority,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach this payload to a parent task.
    ///
    /// `keep_id` is false on create, where client ids are never honored.
    pub fn into_subtask(self, task_id: Option<i64>, keep_id: bool) -> Subtask {
        Subtask {
            id: if keep_id { self.id } else { None },
            task_id,
            description: self.description,
            completed: self.completed,
            priority: self.priority,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_symbolic_names_only() {
        assert_eq!("LOW".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!("MEDIUM".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("high".parse::<Priority>().is_err());
        assert!("2".parse::<Priority>().is_err());
        assert!("".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_serializes_by_name() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
        let parsed: Priority = serde_json::from_str("\"MEDIUM\"").unwrap();
        assert_eq!(parsed, Priority::Medium);
        assert!(serde_json::from_str::<Priority>("1").is_err());
    }

    #[test]
    fn priority_rank_orders_low_to_high() {
        assert!(Priority::Low.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::High.rank());
    }

    #[test]
    fn payload_ignores_client_id_and_distinguishes_missing_subtasks() {
        let payload: TaskPayload = serde_json::from_str(
            r#"{"id": 99, "createdAt": 5, "description": "Task 3", "completed": false, "priority": "LOW"}"#,
        )
        .unwrap();
        assert_eq!(payload.description.as_deref(), Some("Task 3"));
        assert!(payload.subtasks.is_none());

        let payload: TaskPayload =
            serde_json::from_str(r#"{"priority": "HIGH", "subtasks": []}"#).unwrap();
        assert_eq!(payload.subtasks, Some(vec![]));
        assert!(!payload.completed);
        assert!(payload.description.is_none());
    }

    #[test]
    fn into_subtask_drops_id_on_create() {
        let payload = SubtaskPayload::new("write tests", false, 2).with_id(7);
        let created = payload.clone().into_subtask(Some(1), false);
        assert_eq!(created.id, None);
        assert_eq!(created.task_id, Some(1));

        let updated = payload.into_subtask(Some(1), true);
        assert_eq!(updated.id, Some(7));
    }

    #[test]
    fn task_uses_camel_case_on_the_wire() {
        let task = Task {
            id: Some(1),
            description: Some("Task 1".into()),
            completed: false,
            priority: Priority::Low,
            created_at: Some(1_700_000_000_000),
            subtasks: vec![Subtask {
                id: Some(3),
                task_id: Some(1),
                description: None,
                completed: true,
                priority: 1,
            }],
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
        assert_eq!(json["priority"], "LOW");
        assert_eq!(json["subtasks"][0]["taskId"], 1);
    }
}
