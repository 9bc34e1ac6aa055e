//! Repository for the `login_tokens` table.

use sqlx::PgPool;
use taskflow_core::types::Timestamp;

use crate::models::login_token::{CreateLoginToken, LoginToken};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, token_hash, expires_at, consumed_at, created_at";

/// Provides operations for single-use email sign-in tokens.
pub struct LoginTokenRepo;

impl LoginTokenRepo {
    /// Insert a new sign-in token, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLoginToken,
    ) -> Result<LoginToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO login_tokens (email, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoginToken>(&query)
            .bind(&input.email)
            .bind(&input.token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Atomically consume an unexpired, unconsumed token by its hash.
    ///
    /// The single `UPDATE ... RETURNING` makes the token single-use even
    /// under concurrent verification attempts. Returns `None` if the hash is
    /// unknown, already consumed, or expired.
    pub async fn consume(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<LoginToken>, sqlx::Error> {
        let query = format!(
            "UPDATE login_tokens SET consumed_at = NOW()
             WHERE token_hash = $1
               AND consumed_at IS NULL
               AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoginToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Delete tokens that expired before `cutoff` or were already consumed.
    /// Returns the count of deleted rows.
    pub async fn cleanup_expired(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM login_tokens WHERE expires_at < $1 OR consumed_at IS NOT NULL")
                .bind(cutoff)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
