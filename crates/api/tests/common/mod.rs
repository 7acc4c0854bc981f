use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use tavern_api::auth::jwt::{generate_access_token, JwtConfig};
use tavern_api::auth::password::hash_password;
use tavern_api::config::ServerConfig;
use tavern_api::middleware::rate_limit::RateLimiter;
use tavern_api::profiles::ProfileWriter;
use tavern_api::routes;
use tavern_api::state::AppState;
use tavern_api::ws::WsManager;
use tavern_core::types::DbId;
use tavern_db::models::moderator::CreateModerator;
use tavern_db::repositories::ModeratorRepo;

/// Rate limit applied by the default test app. High enough that only the
/// dedicated rate-limit test (which builds its own app) ever trips it.
const TEST_RATE_LIMIT: u32 = 1000;

/// Template used by profile-generation assertions.
const TEST_TEMPLATE: &str = "<h1>{{name}}</h1>\n<p>{{class}} {{level}}</p>\n<ul>{{skills}}</ul>\n<div>{{backstory}}</div>\n";

/// A fully wired application plus the handles tests need to observe it.
pub struct TestApp {
    pub router: Router,
    /// Directory approved profile pages are written into.
    pub profiles_dir: PathBuf,
}

/// Build a test `JwtConfig` with a known secret.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 60,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(profiles_dir: PathBuf, template_path: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        profiles_dir,
        profile_template_path: template_path,
        discord_webhook_url: None,
        rate_limit_max_per_window: TEST_RATE_LIMIT,
        rate_limit_window_secs: 3600,
        jwt: test_jwt_config(),
    }
}

/// Build the full application with all middleware layers, using the given
/// database pool and the default (effectively unlimited) rate limit.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with_rate_limit(pool, TEST_RATE_LIMIT)
}

/// Build the full application with a specific submission rate limit.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app_with_rate_limit(pool: PgPool, rate_limit: u32) -> TestApp {
    // Leak the tempdir so the files outlive the returned TestApp.
    let dir = tempfile::tempdir()
        .expect("tempdir should be creatable")
        .keep();
    let template_path = dir.join("profile.html");
    std::fs::write(&template_path, TEST_TEMPLATE).expect("template should be writable");

    let config = test_config(dir.clone(), template_path);
    let ws_manager = Arc::new(WsManager::new());
    let event_bus = Arc::new(tavern_events::EventBus::default());
    let rate_limiter = Arc::new(RateLimiter::new(rate_limit, Duration::from_secs(3600)));
    let profiles = Arc::new(ProfileWriter::new(
        &config.profile_template_path,
        &config.profiles_dir,
    ));

    let state = AppState {
        pool,
        config: Arc::new(config),
        ws_manager,
        event_bus,
        rate_limiter,
        profiles,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    TestApp {
        router,
        profiles_dir: dir,
    }
}

/// Create a moderator account and return its id plus a valid JWT.
pub async fn seed_moderator(pool: &PgPool, username: &str) -> (DbId, String) {
    let password_hash = hash_password("integration-test-password").expect("hashing should work");
    let moderator = ModeratorRepo::create(
        pool,
        &CreateModerator {
            username: username.to_string(),
            password_hash,
            display_name: format!("Moderator {username}"),
        },
    )
    .await
    .expect("moderator creation should succeed");

    let token = generate_access_token(moderator.id, username, &test_jwt_config())
        .expect("token generation should succeed");

    (moderator.id, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request with no auth.
pub async fn get(router: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    router.oneshot(request).await.unwrap()
}

/// Issue a GET request with a Bearer token.
pub async fn get_auth(router: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    router.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body and no auth.
pub async fn post_json(router: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    router.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body and a Bearer token.
pub async fn post_json_auth(
    router: Router,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    router.oneshot(request).await.unwrap()
}

/// Issue a DELETE request with a Bearer token.
pub async fn delete_auth(router: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    router.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("body should be collectable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// A well-formed submission payload tests can tweak.
pub fn sample_submission(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "player_name": "Sam",
        "ancestry": "Half-Orc",
        "class": "Barbarian",
        "level": 5,
        "alignment": "Chaotic Good",
        "backstory": "Raised by wolves.\n\nNow he raises wolves.",
        "skills": ["Athletics", "Intimidation"],
        "inventory": ["Greataxe", "Rations"],
    })
}
