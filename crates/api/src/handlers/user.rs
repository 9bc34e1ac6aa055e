//! Handlers for the `/users` resource (profile + member pickers).
//!
//! Profile reads and writes are always scoped to the caller's own id; no
//! operation touches another user's profile through this path.

use axum::extract::State;
use axum::Json;
use taskflow_core::error::CoreError;
use taskflow_db::models::user::{UpdateProfile, User, UserSummary};
use taskflow_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::validate_email;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn get_me(State(state): State<AppState>, caller: AuthUser) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, caller.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: caller.user_id,
        }))?;
    Ok(Json(user))
}

/// PUT /api/v1/users/me
///
/// Updates the caller's own name/email. Absent fields are left unchanged;
/// an email collision surfaces as 409.
pub async fn update_me(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(input): Json<UpdateProfile>,
) -> AppResult<Json<User>> {
    if let Some(email) = &input.email {
        validate_email(email).map_err(AppError::Core)?;
    }

    let user = UserRepo::update_profile(&state.pool, caller.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: caller.user_id,
        }))?;
    Ok(Json(user))
}

/// GET /api/v1/users
///
/// Summaries of all users, for member and assignee pickers.
pub async fn list(
    State(state): State<AppState>,
    _caller: AuthUser,
) -> AppResult<Json<Vec<UserSummary>>> {
    let users = UserRepo::list_summaries(&state.pool).await?;
    Ok(Json(users))
}
