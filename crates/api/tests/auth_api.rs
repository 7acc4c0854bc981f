//! Integration tests for moderator login and API key authentication.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, delete_auth, get_auth, post_json, post_json_auth};
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: login returns a token that authenticates /auth/me
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_usable_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (moderator_id, _token) = common::seed_moderator(&pool, "greta").await;

    let response = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        &serde_json::json!({
            "username": "greta",
            "password": "integration-test-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let token = json["access_token"].as_str().expect("token expected");
    assert!(json["expires_in"].as_i64().unwrap() > 0);
    assert_eq!(json["moderator"]["username"], "greta");

    let response = get_auth(app.router.clone(), "/api/v1/auth/me", token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["id"].as_i64(), Some(moderator_id));
    assert_eq!(json["data"]["username"], "greta");
    // The password hash must never serialize.
    assert!(json["data"].get("password_hash").is_none());
}

// ---------------------------------------------------------------------------
// Test: wrong credentials are rejected uniformly
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn bad_credentials_are_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    common::seed_moderator(&pool, "greta").await;

    // Wrong password.
    let response = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        &serde_json::json!({ "username": "greta", "password": "wrong" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unknown username gets the same answer.
    let response = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        &serde_json::json!({ "username": "nobody", "password": "wrong" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid username or password");
}

// ---------------------------------------------------------------------------
// Test: deactivated accounts cannot log in
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn deactivated_account_is_forbidden(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (moderator_id, _token) = common::seed_moderator(&pool, "greta").await;

    sqlx::query("UPDATE moderators SET is_active = false WHERE id = $1")
        .bind(moderator_id)
        .execute(&pool)
        .await
        .expect("deactivation should succeed");

    let response = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        &serde_json::json!({
            "username": "greta",
            "password": "integration-test-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: API keys authenticate moderation endpoints until revoked
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn api_key_lifecycle(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_moderator_id, token) = common::seed_moderator(&pool, "greta").await;

    // Create a key; the plaintext is returned exactly once.
    let response = post_json_auth(
        app.router.clone(),
        "/api/v1/moderation/api-keys",
        &token,
        &serde_json::json!({ "name": "panel-script" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let key_id = json["data"]["id"].as_i64().expect("key id expected");
    let plaintext = json["data"]["plaintext_key"]
        .as_str()
        .expect("plaintext expected")
        .to_string();
    assert!(plaintext.starts_with("tvk_"));
    assert!(plaintext.starts_with(json["data"]["key_prefix"].as_str().unwrap()));

    // The key authenticates a moderation endpoint via X-Api-Key.
    let with_key = |router: axum::Router, key: String| {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/v1/moderation/queue")
            .header("X-Api-Key", key)
            .body(Body::empty())
            .unwrap();
        async move { router.oneshot(request).await.unwrap() }
    };

    let response = with_key(app.router.clone(), plaintext.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Listing never exposes hashes or plaintext.
    let response = get_auth(app.router.clone(), "/api/v1/moderation/api-keys", &token).await;
    let json = body_json(response).await;
    let listed = &json["data"][0];
    assert_eq!(listed["name"], "panel-script");
    assert!(listed.get("key_hash").is_none());
    assert!(listed.get("plaintext_key").is_none());

    // Revoke, after which the key stops working.
    let response = delete_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/api-keys/{key_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = with_key(app.router.clone(), plaintext).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Revoking twice is a 404.
    let response = delete_auth(
        app.router.clone(),
        &format!("/api/v1/moderation/api-keys/{key_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: empty API key names are rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn api_key_name_must_not_be_empty(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_moderator_id, token) = common::seed_moderator(&pool, "greta").await;

    let response = post_json_auth(
        app.router.clone(),
        "/api/v1/moderation/api-keys",
        &token,
        &serde_json::json!({ "name": "   " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
