//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /request-link  -> request_link
/// POST /verify        -> verify
/// POST /refresh       -> refresh
/// POST /logout        -> logout (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request-link", post(auth::request_link))
        .route("/verify", post(auth::verify))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
