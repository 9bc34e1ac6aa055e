//! Repository for the `users` table.

use sqlx::PgPool;
use taskflow_core::types::DbId;

use crate::models::user::{UpdateProfile, User, UserSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, email_verified, image, created_at, updated_at";

/// Columns for the compact summary representation.
const SUMMARY_COLUMNS: &str = "id, name, email, image";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find or create the user for a verified email, stamping
    /// `email_verified` on first sign-in.
    ///
    /// Uses `ON CONFLICT` against the partial unique index on `email` so
    /// concurrent first sign-ins for the same address race safely.
    pub async fn upsert_verified(pool: &PgPool, email: &str) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, email_verified)
             VALUES ($1, NOW())
             ON CONFLICT (email) WHERE email IS NOT NULL
             DO UPDATE SET email_verified = COALESCE(users.email_verified, NOW()),
                           updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Find a user by their internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update the user's own profile. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_optional(pool)
            .await
    }

    /// List summaries of all users, ordered by name then id.
    ///
    /// Used by member/assignee pickers; intentionally exposes only the
    /// summary columns.
    pub async fn list_summaries(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let query =
            format!("SELECT {SUMMARY_COLUMNS} FROM users ORDER BY name NULLS LAST, id");
        sqlx::query_as::<_, UserSummary>(&query).fetch_all(pool).await
    }

    /// Fetch summaries for a set of user IDs (order unspecified).
    pub async fn summaries_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<UserSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM users WHERE id = ANY($1)");
        sqlx::query_as::<_, UserSummary>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
