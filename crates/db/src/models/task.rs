//! Task entity model, status/priority enumerations, and DTOs.

use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

use crate::models::project::Project;
use crate::models::user::UserSummary;

/// Task workflow status. Free-form: any value may move to any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    Normal,
    High,
    Urgent,
}

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<Timestamp>,
    pub project_id: DbId,
    pub created_by_id: DbId,
    pub assigned_to_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task with its project, creator, and assignee resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub project: Project,
    pub created_by: UserSummary,
    pub assigned_to: Option<UserSummary>,
}

/// DTO for creating a new task.
///
/// There is deliberately no `created_by_id` field: the creator is always the
/// authenticated caller, a client-supplied value would be ignored anyway.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub project_id: DbId,
    pub description: Option<String>,
    /// Defaults to `TODO` when omitted.
    pub status: Option<TaskStatus>,
    /// Defaults to `NORMAL` when omitted.
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Timestamp>,
    pub assigned_to_id: Option<DbId>,
}

/// DTO for partially updating a task.
///
/// Nullable columns use double-`Option` fields so the patch distinguishes
/// "absent" (leave unchanged) from "explicitly null" (clear the value):
/// - `None` -- field was not present in the request
/// - `Some(None)` -- field was `null`, clear the column
/// - `Some(Some(v))` -- set the column to `v`
///
/// `project_id` and `created_by_id` are immutable and not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_to_id: Option<Option<DbId>>,
}

impl UpdateTask {
    /// True when the patch contains no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assigned_to_id.is_none()
    }
}

/// Deserialize a present-but-possibly-null field into `Some(Option<T>)`.
///
/// Serde alone cannot tell `"field": null` apart from a missing field for
/// `Option<Option<T>>`; wrapping the inner deserialization restores the
/// distinction (missing fields fall back to the `#[serde(default)]` `None`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch: UpdateTask =
            serde_json::from_str(r#"{"title":"T","description":null}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("T"));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.due_date, None);
        assert_eq!(patch.assigned_to_id, None);
    }

    #[test]
    fn patch_with_values() {
        let patch: UpdateTask =
            serde_json::from_str(r#"{"status":"IN_PROGRESS","assigned_to_id":7}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::InProgress));
        assert_eq!(patch.assigned_to_id, Some(Some(7)));
        assert!(patch.title.is_none());
    }

    #[test]
    fn empty_patch_is_empty() {
        let patch: UpdateTask = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            r#""IN_PROGRESS""#
        );
        assert_eq!(
            serde_json::to_string(&TaskPriority::Urgent).unwrap(),
            r#""URGENT""#
        );
    }
}
