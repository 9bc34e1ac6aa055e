//! Handlers for the `/projects` resource.
//!
//! Authorization rules:
//! - read: owner or member
//! - update/delete: owner only (a member gets Unauthorized, not silence)
//! - ownership is assigned at creation and never transferable

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_db::models::project::{CreateProject, Project, ProjectDetail, UpdateProject};
use taskflow_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects
///
/// All projects where the caller is owner or member, newest first.
pub async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<ProjectDetail>>> {
    let projects = ProjectRepo::list_for_user(&state.pool, caller.user_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let project = ProjectRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    if !project.is_visible_to(caller.user_id) {
        return Err(AppError::Core(CoreError::Unauthorized(
            "You don't have access to this project".into(),
        )));
    }

    Ok(Json(project))
}

/// POST /api/v1/projects
///
/// The caller becomes the owner; `member_ids` is the initial member set.
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".into(),
        )));
    }

    let project = ProjectRepo::create(&state.pool, caller.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// PUT /api/v1/projects/{id}
///
/// Owner only. Replaces name, description, and the FULL member set: an
/// omitted or empty `member_ids` clears all members. `owner_id` is never
/// writable through this operation.
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".into(),
        )));
    }

    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    if existing.owner_id != caller.user_id {
        return Err(AppError::Core(CoreError::Unauthorized(
            "You can only update projects you own".into(),
        )));
    }

    // The row may vanish between the check and the write; treat that as 404.
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Owner only. Cascades to the project's tasks and membership rows.
pub async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    if existing.owner_id != caller.user_id {
        return Err(AppError::Core(CoreError::Unauthorized(
            "You can only delete projects you own".into(),
        )));
    }

    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}
