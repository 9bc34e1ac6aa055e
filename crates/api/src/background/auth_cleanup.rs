//! Periodic cleanup of the auth tables.
//!
//! Spawns a background loop that purges consumed or expired sign-in tokens
//! and expired or revoked refresh sessions. Runs on a fixed interval using
//! `tokio::time::interval` until cancelled.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use taskflow_db::repositories::{LoginTokenRepo, SessionRepo};

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the auth-table cleanup loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Auth cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Auth cleanup job stopping");
                break;
            }
            _ = interval.tick() => {
                match LoginTokenRepo::cleanup_expired(&pool, Utc::now()).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Auth cleanup: purged sign-in tokens");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Auth cleanup: sign-in token purge failed");
                    }
                }
                match SessionRepo::cleanup_expired(&pool).await {
                    Ok(deleted) if deleted > 0 => {
                        tracing::info!(deleted, "Auth cleanup: purged sessions");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Auth cleanup: session purge failed");
                    }
                }
            }
        }
    }
}
