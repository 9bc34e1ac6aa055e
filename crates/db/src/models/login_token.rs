//! Single-use email sign-in token model.

use sqlx::FromRow;
use taskflow_core::types::{DbId, Timestamp};

/// A sign-in token row. Only the SHA-256 hash of the emailed token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct LoginToken {
    pub id: DbId,
    pub email: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for issuing a new sign-in token.
#[derive(Debug, Clone)]
pub struct CreateLoginToken {
    pub email: String,
    pub token_hash: String,
    pub expires_at: Timestamp,
}
