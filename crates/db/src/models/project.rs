//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

use crate::models::user::UserSummary;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project with its owner and member set resolved.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub owner: UserSummary,
    pub members: Vec<UserSummary>,
}

impl ProjectDetail {
    /// Whether `user_id` may read this project (owner or member).
    pub fn is_visible_to(&self, user_id: DbId) -> bool {
        self.project.owner_id == user_id || self.members.iter().any(|m| m.id == user_id)
    }
}

/// DTO for creating a new project. The owner is the caller, never a field.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: Option<String>,
    /// Initial member set. Defaults to empty.
    #[serde(default)]
    pub member_ids: Vec<DbId>,
}

/// DTO for updating a project.
///
/// `member_ids` is a full replacement of the member set, not a merge:
/// an omitted or empty list clears all members.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProject {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub member_ids: Vec<DbId>,
}
