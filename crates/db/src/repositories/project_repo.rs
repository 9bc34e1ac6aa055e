//! Repository for the `projects` and `project_members` tables.
//!
//! Visibility rule: a project is readable by its owner and by every user in
//! its member set; it is writable (update/delete) by the owner only. The
//! owner check happens in the handler (find-then-authorize); the queries
//! here provide the caller-scoped listing and the member-set plumbing.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool};
use taskflow_core::types::DbId;

use crate::models::project::{CreateProject, Project, ProjectDetail, UpdateProject};
use crate::models::user::UserSummary;
use crate::repositories::UserRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, owner_id, created_at, updated_at";

/// A member-summary row joined with its project id, for batch resolution.
#[derive(Debug, FromRow)]
struct MemberRow {
    project_id: DbId,
    id: DbId,
    name: Option<String>,
    email: Option<String>,
    image: Option<String>,
}

/// Provides CRUD operations for projects and their member sets.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project owned by `owner_id` with its initial member set.
    ///
    /// Row insert and membership inserts run in one transaction so a failed
    /// member reference leaves no partial project behind.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (name, description, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        if !input.member_ids.is_empty() {
            sqlx::query(
                "INSERT INTO project_members (project_id, user_id)
                 SELECT $1, UNNEST($2::bigint[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(project.id)
            .bind(&input.member_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(project)
    }

    /// Find a project row by its ID, without resolving relations.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project with owner and members resolved.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let mut details = Self::attach_relations(pool, vec![project]).await?;
        Ok(details.pop())
    }

    /// List projects where `user_id` is the owner or a member, newest first,
    /// with owner and members resolved.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProjectDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE owner_id = $1
                OR id IN (SELECT project_id FROM project_members WHERE user_id = $1)
             ORDER BY created_at DESC"
        );
        let projects = sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Self::attach_relations(pool, projects).await
    }

    /// Replace a project's name, description, and full member set.
    ///
    /// The member set is a full replacement, not a merge: the existing rows
    /// are deleted and `input.member_ids` inserted, all in one transaction.
    /// Returns `None` if no row with the given `id` exists. `owner_id` is
    /// never touched.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET
                name = $2,
                description = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let Some(project) = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if !input.member_ids.is_empty() {
            sqlx::query(
                "INSERT INTO project_members (project_id, user_id)
                 SELECT $1, UNNEST($2::bigint[])
                 ON CONFLICT DO NOTHING",
            )
            .bind(id)
            .bind(&input.member_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Delete a project by ID. Returns `true` if a row was removed.
    ///
    /// Tasks and membership rows go with it via `ON DELETE CASCADE`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `user_id` is the owner or a member of the project.
    pub async fn is_owner_or_member(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM projects WHERE id = $1 AND owner_id = $2
                UNION ALL
                SELECT 1 FROM project_members WHERE project_id = $1 AND user_id = $2
             )",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Resolve owner and member summaries for a batch of project rows.
    async fn attach_relations(
        pool: &PgPool,
        projects: Vec<Project>,
    ) -> Result<Vec<ProjectDetail>, sqlx::Error> {
        if projects.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
        let owner_ids: Vec<DbId> = projects.iter().map(|p| p.owner_id).collect();

        let owners = UserRepo::summaries_by_ids(pool, &owner_ids).await?;
        let owners: HashMap<DbId, UserSummary> =
            owners.into_iter().map(|u| (u.id, u)).collect();

        let member_rows = sqlx::query_as::<_, MemberRow>(
            "SELECT pm.project_id, u.id, u.name, u.email, u.image
             FROM project_members pm
             JOIN users u ON u.id = pm.user_id
             WHERE pm.project_id = ANY($1)
             ORDER BY u.name NULLS LAST, u.id",
        )
        .bind(&project_ids)
        .fetch_all(pool)
        .await?;

        let mut members_by_project: HashMap<DbId, Vec<UserSummary>> = HashMap::new();
        for row in member_rows {
            members_by_project
                .entry(row.project_id)
                .or_default()
                .push(UserSummary {
                    id: row.id,
                    name: row.name,
                    email: row.email,
                    image: row.image,
                });
        }

        projects
            .into_iter()
            .map(|project| {
                // The FK on owner_id guarantees the owner row exists.
                let owner = owners
                    .get(&project.owner_id)
                    .cloned()
                    .ok_or(sqlx::Error::RowNotFound)?;
                let members = members_by_project.remove(&project.id).unwrap_or_default();
                Ok(ProjectDetail {
                    project,
                    owner,
                    members,
                })
            })
            .collect()
    }
}
