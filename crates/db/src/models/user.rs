//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// `name` and `email` are nullable: a user row exists as soon as a sign-in
/// link is consumed, profile fields are filled in afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<Timestamp>,
    pub image: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Compact user representation embedded in project and task responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<String>,
}

/// DTO for updating the caller's own profile. Absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
}
