//! Handlers for the `/auth` resource (email-link sign-in, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use taskflow_core::error::CoreError;
use taskflow_core::types::DbId;
use taskflow_db::models::login_token::CreateLoginToken;
use taskflow_db::models::session::CreateSession;
use taskflow_db::repositories::{LoginTokenRepo, SessionRepo, UserRepo};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_token};
use crate::auth::magic_link::{
    build_login_link, generate_login_token, send_login_email, LOGIN_TOKEN_EXPIRY_MINS,
};
use crate::error::{AppError, AppResult};
use crate::handlers::validate_email;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/request-link`.
#[derive(Debug, Deserialize)]
pub struct RequestLinkRequest {
    pub email: String,
}

/// Request body for `POST /auth/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by verify and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Public user info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub name: Option<String>,
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/request-link
///
/// Issue a single-use sign-in link for the given address. Responds 202
/// whether or not the address belongs to an existing user, so the endpoint
/// does not reveal who is registered. When SMTP is not configured the link
/// is logged at debug level instead of emailed.
pub async fn request_link(
    State(state): State<AppState>,
    Json(input): Json<RequestLinkRequest>,
) -> AppResult<StatusCode> {
    let email = input.email.trim().to_ascii_lowercase();
    validate_email(&email).map_err(AppError::Core)?;

    let (plaintext, token_hash) = generate_login_token();
    let token_input = CreateLoginToken {
        email: email.clone(),
        token_hash,
        expires_at: Utc::now() + chrono::Duration::minutes(LOGIN_TOKEN_EXPIRY_MINS),
    };
    LoginTokenRepo::create(&state.pool, &token_input).await?;

    let link = build_login_link(&state.config.app_url, &plaintext);

    match &state.config.email {
        Some(email_config) => {
            send_login_email(email_config, &email, &link)
                .await
                .map_err(|e| AppError::InternalError(format!("Sign-in email error: {e}")))?;
            tracing::info!(%email, "Sign-in link emailed");
        }
        None => {
            tracing::debug!(%email, %link, "SMTP not configured; sign-in link logged");
        }
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/verify
///
/// Consume a sign-in token. Creates the user row on first sign-in and stamps
/// `email_verified`; returns access + refresh tokens.
pub async fn verify(
    State(state): State<AppState>,
    Json(input): Json<VerifyRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_token(input.token.trim());

    let login_token = LoginTokenRepo::consume(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired sign-in link".into(),
            ))
        })?;

    let user = UserRepo::upsert_verified(&state.pool, &login_token.email).await?;
    tracing::info!(user_id = user.id, "User signed in via email link");

    let response = create_auth_response(&state, user.id, user.name, user.email).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Hash the provided refresh token.
    let token_hash = hash_token(&input.refresh_token);

    // 2. Find matching active session.
    let session = SessionRepo::find_by_refresh_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    // 3. Revoke old session (token rotation).
    SessionRepo::revoke(&state.pool, session.id).await?;

    // 4. Find the user.
    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    // 5. Generate new tokens and create new session.
    let response = create_auth_response(&state, user.id, user.name, user.email).await?;
    Ok(Json(response))
}

/// POST /api/v1/auth/logout
///
/// Revoke all sessions for the authenticated caller. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, caller: AuthUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, caller.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(
    state: &AppState,
    user_id: DbId,
    name: Option<String>,
    email: Option<String>,
) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at =
        Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);

    let session_input = CreateSession {
        user_id,
        refresh_token_hash: refresh_hash,
        expires_at,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: UserInfo {
            id: user_id,
            name,
            email,
        },
    })
}
