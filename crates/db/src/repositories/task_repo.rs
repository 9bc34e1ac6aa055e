//! Repository for the `tasks` table.
//!
//! Visibility rule: a task is readable by its creator and its assignee.
//! This is deliberately narrower than project membership -- a project member
//! does not see tasks they neither created nor were assigned -- and the
//! queries here preserve that filter exactly.

use std::collections::HashMap;

use sqlx::PgPool;
use taskflow_core::types::DbId;

use crate::models::project::Project;
use crate::models::task::{CreateTask, Task, TaskDetail, UpdateTask};
use crate::models::user::UserSummary;
use crate::repositories::UserRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, status, priority, due_date, \
                       project_id, created_by_id, assigned_to_id, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task created by `created_by_id`, returning the row.
    ///
    /// `status` defaults to `TODO` and `priority` to `NORMAL` when omitted.
    /// The creator is always the caller's id, never client input.
    pub async fn create(
        pool: &PgPool,
        created_by_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (title, description, status, priority, due_date, project_id,
                 created_by_id, assigned_to_id)
             VALUES ($1, $2, COALESCE($3, 'TODO'::task_status),
                     COALESCE($4, 'NORMAL'::task_priority), $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.due_date)
            .bind(input.project_id)
            .bind(created_by_id)
            .bind(input.assigned_to_id)
            .fetch_one(pool)
            .await
    }

    /// Find a task row by ID regardless of caller visibility.
    ///
    /// Used by the mutation paths, which authorize against the row itself.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a task by ID only if `user_id` is its creator or assignee.
    ///
    /// Returns `None` both when the task is absent and when it exists but is
    /// not visible, so read paths cannot leak record existence.
    pub async fn find_visible(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE id = $1 AND (created_by_id = $2 OR assigned_to_id = $2)"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks in a project where `user_id` is creator or assignee,
    /// newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE project_id = $1 AND (created_by_id = $2 OR assigned_to_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// List tasks across all projects where `user_id` is creator or
    /// assignee, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE created_by_id = $1 OR assigned_to_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a partial patch to a task. Returns `None` if the row is absent.
    ///
    /// Non-nullable fields use `COALESCE` (absent leaves the value). For
    /// nullable columns a boolean "set" flag drives a `CASE` expression so an
    /// explicit null clears the column while an absent field leaves it alone.
    /// `project_id` and `created_by_id` are immutable and never part of the
    /// statement.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                priority = COALESCE($6, priority),
                due_date = CASE WHEN $7 THEN $8 ELSE due_date END,
                assigned_to_id = CASE WHEN $9 THEN $10 ELSE assigned_to_id END,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .bind(input.status)
            .bind(input.priority)
            .bind(input.due_date.is_some())
            .bind(input.due_date.flatten())
            .bind(input.assigned_to_id.is_some())
            .bind(input.assigned_to_id.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a task by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Resolve project, creator, and assignee for a single task.
    pub async fn attach_relations(
        pool: &PgPool,
        task: Task,
    ) -> Result<TaskDetail, sqlx::Error> {
        let mut details = Self::attach_relations_many(pool, vec![task]).await?;
        details.pop().ok_or(sqlx::Error::RowNotFound)
    }

    /// Resolve project, creator, and assignee summaries for a batch of tasks.
    pub async fn attach_relations_many(
        pool: &PgPool,
        tasks: Vec<Task>,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let project_ids: Vec<DbId> = tasks.iter().map(|t| t.project_id).collect();
        let mut user_ids: Vec<DbId> = tasks.iter().map(|t| t.created_by_id).collect();
        user_ids.extend(tasks.iter().filter_map(|t| t.assigned_to_id));

        let projects = sqlx::query_as::<_, Project>(
            "SELECT id, name, description, owner_id, created_at, updated_at
             FROM projects WHERE id = ANY($1)",
        )
        .bind(&project_ids)
        .fetch_all(pool)
        .await?;
        let projects: HashMap<DbId, Project> =
            projects.into_iter().map(|p| (p.id, p)).collect();

        let users = UserRepo::summaries_by_ids(pool, &user_ids).await?;
        let users: HashMap<DbId, UserSummary> =
            users.into_iter().map(|u| (u.id, u)).collect();

        tasks
            .into_iter()
            .map(|task| {
                // FKs guarantee the project and creator rows exist.
                let project = projects
                    .get(&task.project_id)
                    .cloned()
                    .ok_or(sqlx::Error::RowNotFound)?;
                let created_by = users
                    .get(&task.created_by_id)
                    .cloned()
                    .ok_or(sqlx::Error::RowNotFound)?;
                let assigned_to = task
                    .assigned_to_id
                    .and_then(|id| users.get(&id).cloned());
                Ok(TaskDetail {
                    task,
                    project,
                    created_by,
                    assigned_to,
                })
            })
            .collect()
    }
}
