mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{body_json, build_test_app, get, put_json, seed_user, token_for};

#[sqlx::test(migrations = "../db/migrations")]
async fn me_returns_the_caller(pool: PgPool) {
    let user = seed_user(&pool, "me@example.com").await;
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/users/me", Some(&token_for(user.id))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], user.id);
    assert_eq!(body["email"], "me@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_me_applies_partial_changes(pool: PgPool) {
    let user = seed_user(&pool, "me@example.com").await;
    let token = token_for(user.id);
    let app = build_test_app(pool);

    let renamed = put_json(
        app.clone(),
        "/api/v1/users/me",
        Some(&token),
        json!({"name": "Alice"}),
    )
    .await;
    assert_eq!(renamed.status(), StatusCode::OK);

    let renamed_body = body_json(renamed).await;
    assert_eq!(renamed_body["name"], "Alice");
    assert_eq!(renamed_body["email"], "me@example.com");

    let re_addressed = put_json(
        app,
        "/api/v1/users/me",
        Some(&token),
        json!({"email": "alice@example.com"}),
    )
    .await;
    let re_addressed_body = body_json(re_addressed).await;
    assert_eq!(re_addressed_body["name"], "Alice");
    assert_eq!(re_addressed_body["email"], "alice@example.com");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_me_rejects_taken_email(pool: PgPool) {
    seed_user(&pool, "taken@example.com").await;
    let user = seed_user(&pool, "me@example.com").await;
    let app = build_test_app(pool);

    let response = put_json(
        app,
        "/api/v1/users/me",
        Some(&token_for(user.id)),
        json!({"email": "taken@example.com"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_me_rejects_malformed_email(pool: PgPool) {
    let user = seed_user(&pool, "me@example.com").await;
    let app = build_test_app(pool);

    let response = put_json(
        app,
        "/api/v1/users/me",
        Some(&token_for(user.id)),
        json!({"email": "no-at-sign"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn user_directory_lists_summaries(pool: PgPool) {
    let caller = seed_user(&pool, "caller@example.com").await;
    seed_user(&pool, "peer@example.com").await;
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/users", Some(&token_for(caller.id))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    // Summaries expose picker fields only.
    assert!(users[0].get("email_verified").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn user_directory_requires_authentication(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/users", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
