//! Handlers for the `/tasks` resource.
//!
//! Authorization rules:
//! - read/list: creator or assignee only. This is narrower than project
//!   membership on purpose; a member of the project does not see tasks they
//!   neither created nor were assigned. Absent and not-visible both surface
//!   as NotFound so callers cannot probe for task existence.
//! - create: caller must be owner or member of the target project.
//! - update: creator, assignee, or owner of the task's project.
//! - delete: creator only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_db::models::task::{CreateTask, TaskDetail, UpdateTask};
use taskflow_db::repositories::{ProjectRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/tasks
///
/// Tasks in the project where the caller is creator or assignee, newest first.
pub async fn list_by_project(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<TaskDetail>>> {
    let tasks = TaskRepo::list_for_project(&state.pool, project_id, caller.user_id).await?;
    let tasks = TaskRepo::attach_relations_many(&state.pool, tasks).await?;
    Ok(Json(tasks))
}

/// GET /api/v1/tasks
///
/// Tasks across all projects where the caller is creator or assignee.
pub async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<TaskDetail>>> {
    let tasks = TaskRepo::list_for_user(&state.pool, caller.user_id).await?;
    let tasks = TaskRepo::attach_relations_many(&state.pool, tasks).await?;
    Ok(Json(tasks))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TaskDetail>> {
    let task = TaskRepo::find_visible(&state.pool, id, caller.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    let task = TaskRepo::attach_relations(&state.pool, task).await?;
    Ok(Json(task))
}

/// POST /api/v1/tasks
///
/// The creator is always the caller; any client-supplied creator is ignored
/// (the field does not even exist on the DTO). Defaults: status TODO,
/// priority NORMAL.
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<TaskDetail>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Task title must not be empty".into(),
        )));
    }

    ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }))?;

    if !ProjectRepo::is_owner_or_member(&state.pool, input.project_id, caller.user_id).await? {
        return Err(AppError::Core(CoreError::Unauthorized(
            "You can only create tasks in projects you belong to".into(),
        )));
    }

    let task = TaskRepo::create(&state.pool, caller.user_id, &input).await?;
    let task = TaskRepo::attach_relations(&state.pool, task).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /api/v1/tasks/{id}
///
/// Partial merge: only fields present in the request are overwritten; for
/// nullable fields an explicit null clears the value. `project_id` and
/// `created_by_id` are immutable.
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<TaskDetail>> {
    if let Some(title) = &input.title {
        if title.trim().is_empty() {
            return Err(AppError::Core(CoreError::Validation(
                "Task title must not be empty".into(),
            )));
        }
    }

    let existing = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    let authorized = existing.created_by_id == caller.user_id
        || existing.assigned_to_id == Some(caller.user_id)
        || is_project_owner(&state, existing.project_id, caller.user_id).await?;

    if !authorized {
        return Err(AppError::Core(CoreError::Unauthorized(
            "You can only update tasks you created, are assigned to, or own the project of"
                .into(),
        )));
    }

    // An empty patch is a no-op merge; skip the write entirely.
    let task = if input.is_empty() {
        existing
    } else {
        TaskRepo::update(&state.pool, id, &input)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?
    };

    let task = TaskRepo::attach_relations(&state.pool, task).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
///
/// Creator only. The assignee explicitly cannot delete.
pub async fn delete(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    if existing.created_by_id != caller.user_id {
        return Err(AppError::Core(CoreError::Unauthorized(
            "You can only delete tasks you created".into(),
        )));
    }

    let deleted = TaskRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}

/// Whether `user_id` owns `project_id`.
async fn is_project_owner(
    state: &AppState,
    project_id: DbId,
    user_id: DbId,
) -> Result<bool, AppError> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id).await?;
    Ok(project.is_some_and(|p| p.owner_id == user_id))
}
