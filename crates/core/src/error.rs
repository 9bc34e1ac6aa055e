use crate::types::DbId;

/// Domain error taxonomy shared by the repository and HTTP layers.
///
/// `NotFound` doubles as the visibility error for task reads: a task that
/// exists but is not visible to the caller surfaces exactly like one that
/// does not exist, so callers cannot probe for record existence.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
