//! Integration tests for the moderation workflow: queue, decisions,
//! profile generation, deletion, and the activity feed.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get, get_auth, post_json, post_json_auth, sample_submission,
};
use sqlx::PgPool;
use tavern_db::repositories::EventRepo;

/// Submit a character and return its id.
async fn submit_character(app: &common::TestApp, name: &str) -> i64 {
    let response = post_json(
        app.router.clone(),
        "/api/v1/characters",
        &sample_submission(name),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Test: moderation endpoints require credentials
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn moderation_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.router.clone(), "/api/v1/moderation/queue").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.router.clone(), "/api/v1/moderation/queue", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Test: queue lists pending characters oldest-first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn queue_lists_pending_oldest_first(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_id, token) = common::seed_moderator(&pool, "greta").await;

    let first = submit_character(&app, "First In").await;
    let second = submit_character(&app, "Second In").await;

    let response = get_auth(app.router.clone(), "/api/v1/moderation/queue", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let queue = json["data"].as_array().expect("queue should be an array");
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0]["id"].as_i64(), Some(first));
    assert_eq!(queue[1]["id"].as_i64(), Some(second));
}

// ---------------------------------------------------------------------------
// Test: approval transitions the character and writes its profile page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn approve_writes_profile_and_updates_status(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (moderator_id, token) = common::seed_moderator(&pool, "greta").await;

    let id = submit_character(&app, "Thog the Bold").await;

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/characters/{id}/approve"),
        &token,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let character = &json["data"];
    assert_eq!(character["status"], "approved");
    assert_eq!(character["reviewed_by"].as_i64(), Some(moderator_id));
    assert!(character["reviewed_at"].is_string());

    // The static profile page exists and carries the rendered sheet.
    let slug = character["slug"].as_str().unwrap();
    let page = std::fs::read_to_string(app.profiles_dir.join(format!("{slug}.html")))
        .expect("profile page should have been written");
    assert!(page.contains("<h1>Thog the Bold</h1>"));
    assert!(page.contains("<li>Athletics</li>"));

    // The character is now publicly visible.
    let response = get(app.router.clone(), &format!("/api/v1/characters/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app.router.clone(), "/api/v1/characters").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: rejection records the reason and generates no page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn reject_records_reason(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_id, token) = common::seed_moderator(&pool, "greta").await;

    let id = submit_character(&app, "Thog the Bold").await;

    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/characters/{id}/reject"),
        &token,
        &serde_json::json!({ "reason": "incomplete backstory" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "rejected");
    assert_eq!(json["data"]["rejection_reason"], "incomplete backstory");

    // No profile page was generated.
    let slug = json["data"]["slug"].as_str().unwrap();
    assert!(!app.profiles_dir.join(format!("{slug}.html")).exists());

    // Still hidden from the public gallery.
    let response = get(app.router.clone(), "/api/v1/characters").await;
    let gallery = body_json(response).await;
    assert_eq!(gallery["data"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Test: decided characters cannot be re-decided
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn decisions_are_final(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_id, token) = common::seed_moderator(&pool, "greta").await;

    let id = submit_character(&app, "Thog the Bold").await;

    let approve_uri = format!("/api/v1/moderation/characters/{id}/approve");
    let reject_uri = format!("/api/v1/moderation/characters/{id}/reject");

    let response =
        post_json_auth(app.router.clone(), &approve_uri, &token, &serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Re-approving is a conflict.
    let response =
        post_json_auth(app.router.clone(), &approve_uri, &token, &serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Rejecting after approval is a conflict too.
    let response =
        post_json_auth(app.router.clone(), &reject_uri, &token, &serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Test: decisions on unknown characters return 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn decision_on_missing_character_is_404(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_id, token) = common::seed_moderator(&pool, "greta").await;

    let response = post_json_auth(
        app.router.clone(),
        "/api/v1/moderation/characters/999999/approve",
        &token,
        &serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: deletion removes the record and its profile page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_character_and_page(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_id, token) = common::seed_moderator(&pool, "greta").await;

    let id = submit_character(&app, "Short Lived").await;

    // Approve so a page exists.
    let response = post_json_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/characters/{id}/approve"),
        &token,
        &serde_json::json!({}),
    )
    .await;
    let slug = body_json(response).await["data"]["slug"]
        .as_str()
        .unwrap()
        .to_string();
    let page_path = app.profiles_dir.join(format!("{slug}.html"));
    assert!(page_path.exists());

    let response = delete_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/characters/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Record and page are both gone.
    let response = get_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/characters/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!page_path.exists());

    // Deleting again is a 404.
    let response = delete_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/characters/{id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: status filter and counts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_status_and_counts_add_up(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_id, token) = common::seed_moderator(&pool, "greta").await;

    let a = submit_character(&app, "Alpha").await;
    let _b = submit_character(&app, "Beta").await;

    post_json_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/characters/{a}/approve"),
        &token,
        &serde_json::json!({}),
    )
    .await;

    let response = get_auth(
        app.router.clone(),
        "/api/v1/moderation/characters?status=pending",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // An invalid status is a validation error.
    let response = get_auth(
        app.router.clone(),
        "/api/v1/moderation/characters?status=flagged",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(app.router.clone(), "/api/v1/moderation/counts", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["pending"], 1);
    assert_eq!(json["data"]["approved"], 1);
    assert_eq!(json["data"]["rejected"], 0);
}

// ---------------------------------------------------------------------------
// Test: activity feed returns persisted events newest-first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn events_feed_returns_recent_events(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (moderator_id, token) = common::seed_moderator(&pool, "greta").await;

    // The persistence service runs as a separate task in production; the
    // feed itself just reads the table, so seed rows directly.
    EventRepo::insert(
        &pool,
        "character.submitted",
        Some("character"),
        Some(1),
        None,
        &serde_json::json!({"name": "Thog"}),
    )
    .await
    .expect("insert should succeed");
    EventRepo::insert(
        &pool,
        "character.approved",
        Some("character"),
        Some(1),
        Some(moderator_id),
        &serde_json::json!({"name": "Thog"}),
    )
    .await
    .expect("insert should succeed");

    let response = get_auth(app.router.clone(), "/api/v1/moderation/events?limit=10", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let events = json["data"].as_array().expect("events should be an array");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event_type"], "character.approved");
    assert_eq!(events[0]["actor_moderator_id"].as_i64(), Some(moderator_id));
    assert_eq!(events[1]["event_type"], "character.submitted");
}
