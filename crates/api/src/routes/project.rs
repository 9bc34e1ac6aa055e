//! Route definitions for the `/projects` resource.
//!
//! Also nests the project-scoped task listing under
//! `/projects/{project_id}/tasks`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{project, task};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
///
/// GET    /{project_id}/tasks      -> list_by_project
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{project_id}/tasks", get(task::list_by_project))
}
