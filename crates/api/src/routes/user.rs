//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET /       -> list (summaries for member/assignee pickers)
/// GET /me     -> get_me
/// PUT /me     -> update_me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list))
        .route("/me", get(user::get_me).put(user::update_me))
}
