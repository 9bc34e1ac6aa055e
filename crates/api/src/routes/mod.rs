pub mod auth;
pub mod health;
pub mod project;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/request-link               issue sign-in link (public)
/// /auth/verify                     consume sign-in link (public)
/// /auth/refresh                    refresh tokens (public)
/// /auth/logout                     revoke sessions (requires auth)
///
/// /projects                        list, create
/// /projects/{id}                   get, update, delete
/// /projects/{project_id}/tasks     list caller-visible tasks in project
///
/// /tasks                           list caller-visible tasks, create
/// /tasks/{id}                      get, patch, delete
///
/// /users                           list summaries (pickers)
/// /users/me                        get, update own profile
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
        .nest("/users", user::router())
}
