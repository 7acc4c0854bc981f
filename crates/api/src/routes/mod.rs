pub mod auth;
pub mod character;
pub mod health;
pub mod moderation;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                      moderator WebSocket (?token=)
///
/// /auth/login                              login (public)
/// /auth/me                                 identity echo (requires auth)
///
/// /characters                              submit (POST, rate-limited), gallery (GET)
/// /characters/{id}                         public view, approved only (GET)
///
/// /moderation/queue                        pending queue (GET)
/// /moderation/characters                   list all statuses (GET, ?status=)
/// /moderation/characters/{id}              get any status (GET)
/// /moderation/characters/{id}/approve      approve (POST)
/// /moderation/characters/{id}/reject       reject (POST)
/// /moderation/characters/{id}              delete (DELETE)
/// /moderation/counts                       per-status totals (GET)
/// /moderation/events                       activity feed (GET)
/// /moderation/api-keys                     list, create (GET, POST)
/// /moderation/api-keys/{id}                revoke (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint for the moderator panel.
        .route("/ws", get(ws::ws_handler))
        // Authentication routes.
        .nest("/auth", auth::router())
        // Public submission + gallery.
        .nest("/characters", character::router())
        // Moderation panel.
        .nest("/moderation", moderation::router())
}
