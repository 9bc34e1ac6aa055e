//! Integration tests for the caller-scoped visibility queries.
//!
//! Exercises the authorization-relevant repository behavior against a real
//! database:
//! - project listing scoped to owner-or-member
//! - task visibility scoped to creator-or-assignee (NOT project membership)
//! - full member-set replacement on project update
//! - cascade delete from project to tasks

use sqlx::PgPool;
use taskflow_db::models::project::{CreateProject, UpdateProject};
use taskflow_db::models::task::CreateTask;
use taskflow_db::models::user::User;
use taskflow_db::repositories::{ProjectRepo, TaskRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, email: &str) -> User {
    UserRepo::upsert_verified(pool, email)
        .await
        .expect("seeding user should succeed")
}

fn new_project(name: &str, member_ids: Vec<i64>) -> CreateProject {
    CreateProject {
        name: name.to_string(),
        description: None,
        member_ids,
    }
}

fn new_task(project_id: i64, title: &str, assigned_to_id: Option<i64>) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        project_id,
        description: None,
        status: None,
        priority: None,
        due_date: None,
        assigned_to_id,
    }
}

/// Shift a project's creation time back so descending-order assertions
/// are deterministic.
async fn age_project(pool: &PgPool, id: i64, hours: i32) {
    sqlx::query("UPDATE projects SET created_at = created_at - ($2 || ' hours')::interval WHERE id = $1")
        .bind(id)
        .bind(hours.to_string())
        .execute(pool)
        .await
        .unwrap();
}

/// Same, for tasks.
async fn age_task(pool: &PgPool, id: i64, hours: i32) {
    sqlx::query("UPDATE tasks SET created_at = created_at - ($2 || ' hours')::interval WHERE id = $1")
        .bind(id)
        .bind(hours.to_string())
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Project visibility
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn list_includes_owned_and_member_projects_only(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let member = seed_user(&pool, "member@example.com").await;
    let outsider = seed_user(&pool, "outsider@example.com").await;

    let owned = ProjectRepo::create(&pool, owner.id, &new_project("Owned", vec![]))
        .await
        .unwrap();
    let shared = ProjectRepo::create(&pool, owner.id, &new_project("Shared", vec![member.id]))
        .await
        .unwrap();

    let for_owner = ProjectRepo::list_for_user(&pool, owner.id).await.unwrap();
    assert_eq!(for_owner.len(), 2);

    let for_member = ProjectRepo::list_for_user(&pool, member.id).await.unwrap();
    assert_eq!(for_member.len(), 1);
    assert_eq!(for_member[0].project.id, shared.id);

    let for_outsider = ProjectRepo::list_for_user(&pool, outsider.id).await.unwrap();
    assert!(for_outsider.is_empty());

    // The owner is authorized without appearing in the member set.
    let detail = ProjectRepo::find_detail(&pool, owned.id).await.unwrap().unwrap();
    assert!(detail.is_visible_to(owner.id));
    assert!(detail.members.is_empty());
}

#[sqlx::test]
async fn list_orders_newest_first(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;

    let older = ProjectRepo::create(&pool, owner.id, &new_project("Older", vec![]))
        .await
        .unwrap();
    let newer = ProjectRepo::create(&pool, owner.id, &new_project("Newer", vec![]))
        .await
        .unwrap();
    age_project(&pool, older.id, 1).await;

    let projects = ProjectRepo::list_for_user(&pool, owner.id).await.unwrap();
    assert_eq!(projects[0].project.id, newer.id);
    assert_eq!(projects[1].project.id, older.id);
}

#[sqlx::test]
async fn detail_resolves_owner_and_members(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let a = seed_user(&pool, "a@example.com").await;
    let b = seed_user(&pool, "b@example.com").await;

    let project = ProjectRepo::create(&pool, owner.id, &new_project("P", vec![a.id, b.id]))
        .await
        .unwrap();

    let detail = ProjectRepo::find_detail(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(detail.owner.id, owner.id);
    assert_eq!(detail.owner.email.as_deref(), Some("owner@example.com"));
    let mut member_ids: Vec<i64> = detail.members.iter().map(|m| m.id).collect();
    member_ids.sort_unstable();
    assert_eq!(member_ids, vec![a.id, b.id]);

    assert!(detail.is_visible_to(a.id));
    assert!(detail.is_visible_to(owner.id));
    assert!(!detail.is_visible_to(owner.id + a.id + b.id + 1));
}

#[sqlx::test]
async fn is_owner_or_member_checks_both_paths(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let member = seed_user(&pool, "member@example.com").await;
    let outsider = seed_user(&pool, "outsider@example.com").await;

    let project = ProjectRepo::create(&pool, owner.id, &new_project("P", vec![member.id]))
        .await
        .unwrap();

    assert!(ProjectRepo::is_owner_or_member(&pool, project.id, owner.id).await.unwrap());
    assert!(ProjectRepo::is_owner_or_member(&pool, project.id, member.id).await.unwrap());
    assert!(!ProjectRepo::is_owner_or_member(&pool, project.id, outsider.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Member-set replacement
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn update_replaces_full_member_set(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let a = seed_user(&pool, "a@example.com").await;
    let b = seed_user(&pool, "b@example.com").await;

    let project = ProjectRepo::create(&pool, owner.id, &new_project("P", vec![a.id]))
        .await
        .unwrap();

    let input = UpdateProject {
        name: "P".to_string(),
        description: Some("now with b".to_string()),
        member_ids: vec![b.id],
    };
    ProjectRepo::update(&pool, project.id, &input).await.unwrap().unwrap();

    let detail = ProjectRepo::find_detail(&pool, project.id).await.unwrap().unwrap();
    let member_ids: Vec<i64> = detail.members.iter().map(|m| m.id).collect();
    assert_eq!(member_ids, vec![b.id], "replacement, not merge");
    assert_eq!(detail.project.description.as_deref(), Some("now with b"));
}

#[sqlx::test]
async fn update_with_empty_member_list_clears_members(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let a = seed_user(&pool, "a@example.com").await;

    let project = ProjectRepo::create(&pool, owner.id, &new_project("P", vec![a.id]))
        .await
        .unwrap();

    let input = UpdateProject {
        name: "P".to_string(),
        description: None,
        member_ids: vec![],
    };
    ProjectRepo::update(&pool, project.id, &input).await.unwrap().unwrap();

    let detail = ProjectRepo::find_detail(&pool, project.id).await.unwrap().unwrap();
    assert!(detail.members.is_empty());
}

#[sqlx::test]
async fn update_never_touches_owner(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;

    let project = ProjectRepo::create(&pool, owner.id, &new_project("P", vec![]))
        .await
        .unwrap();

    let input = UpdateProject {
        name: "Renamed".to_string(),
        description: None,
        member_ids: vec![],
    };
    let updated = ProjectRepo::update(&pool, project.id, &input).await.unwrap().unwrap();
    assert_eq!(updated.owner_id, owner.id);
    assert_eq!(updated.name, "Renamed");
}

// ---------------------------------------------------------------------------
// Task visibility
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn task_visible_to_creator_and_assignee_only(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let assignee = seed_user(&pool, "assignee@example.com").await;
    let member = seed_user(&pool, "member@example.com").await;

    let project = ProjectRepo::create(
        &pool,
        owner.id,
        &new_project("P", vec![assignee.id, member.id]),
    )
    .await
    .unwrap();

    let task = TaskRepo::create(&pool, owner.id, &new_task(project.id, "T", Some(assignee.id)))
        .await
        .unwrap();

    assert!(TaskRepo::find_visible(&pool, task.id, owner.id).await.unwrap().is_some());
    assert!(TaskRepo::find_visible(&pool, task.id, assignee.id).await.unwrap().is_some());
    // A project member who is neither creator nor assignee sees nothing.
    assert!(TaskRepo::find_visible(&pool, task.id, member.id).await.unwrap().is_none());
}

#[sqlx::test]
async fn project_task_list_filters_by_creator_or_assignee(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let member = seed_user(&pool, "member@example.com").await;

    let project = ProjectRepo::create(&pool, owner.id, &new_project("P", vec![member.id]))
        .await
        .unwrap();

    // Created by owner, assigned to nobody: invisible to the member.
    TaskRepo::create(&pool, owner.id, &new_task(project.id, "Owner's", None))
        .await
        .unwrap();
    // Assigned to the member.
    let assigned = TaskRepo::create(
        &pool,
        owner.id,
        &new_task(project.id, "Member's", Some(member.id)),
    )
    .await
    .unwrap();

    let for_member = TaskRepo::list_for_project(&pool, project.id, member.id).await.unwrap();
    assert_eq!(for_member.len(), 1);
    assert_eq!(for_member[0].id, assigned.id);

    let for_owner = TaskRepo::list_for_project(&pool, project.id, owner.id).await.unwrap();
    assert_eq!(for_owner.len(), 2);
}

#[sqlx::test]
async fn global_task_list_spans_projects(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let other = seed_user(&pool, "other@example.com").await;

    let p1 = ProjectRepo::create(&pool, owner.id, &new_project("P1", vec![]))
        .await
        .unwrap();
    let p2 = ProjectRepo::create(&pool, other.id, &new_project("P2", vec![]))
        .await
        .unwrap();

    TaskRepo::create(&pool, owner.id, &new_task(p1.id, "Mine", None))
        .await
        .unwrap();
    TaskRepo::create(&pool, other.id, &new_task(p2.id, "Assigned to me", Some(owner.id)))
        .await
        .unwrap();
    TaskRepo::create(&pool, other.id, &new_task(p2.id, "Not mine", None))
        .await
        .unwrap();

    let tasks = TaskRepo::list_for_user(&pool, owner.id).await.unwrap();
    assert_eq!(tasks.len(), 2);
}

#[sqlx::test]
async fn task_lists_order_newest_first(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let other = seed_user(&pool, "other@example.com").await;

    let p1 = ProjectRepo::create(&pool, owner.id, &new_project("P1", vec![]))
        .await
        .unwrap();
    let p2 = ProjectRepo::create(&pool, other.id, &new_project("P2", vec![]))
        .await
        .unwrap();

    let older = TaskRepo::create(&pool, owner.id, &new_task(p1.id, "Older", None))
        .await
        .unwrap();
    let newer = TaskRepo::create(&pool, owner.id, &new_task(p1.id, "Newer", None))
        .await
        .unwrap();
    let elsewhere = TaskRepo::create(
        &pool,
        other.id,
        &new_task(p2.id, "Elsewhere", Some(owner.id)),
    )
    .await
    .unwrap();
    age_task(&pool, older.id, 2).await;
    age_task(&pool, elsewhere.id, 1).await;

    let in_project = TaskRepo::list_for_project(&pool, p1.id, owner.id).await.unwrap();
    let ids: Vec<i64> = in_project.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    let across = TaskRepo::list_for_user(&pool, owner.id).await.unwrap();
    let ids: Vec<i64> = across.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![newer.id, elsewhere.id, older.id]);
}

// ---------------------------------------------------------------------------
// Cascade delete
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn project_delete_cascades_to_tasks_and_members(pool: PgPool) {
    let owner = seed_user(&pool, "owner@example.com").await;
    let member = seed_user(&pool, "member@example.com").await;

    let project = ProjectRepo::create(&pool, owner.id, &new_project("P", vec![member.id]))
        .await
        .unwrap();
    let task = TaskRepo::create(&pool, owner.id, &new_task(project.id, "T", None))
        .await
        .unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());

    assert!(TaskRepo::find_by_id(&pool, task.id).await.unwrap().is_none());
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM project_members WHERE project_id = $1")
            .bind(project.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(remaining, 0);
    // The member user itself survives.
    assert!(UserRepo::find_by_id(&pool, member.id).await.unwrap().is_some());
}
