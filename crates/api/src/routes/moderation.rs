//! Route definitions for the `/moderation` panel surface.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{api_keys, moderation};
use crate::state::AppState;

/// Routes mounted at `/moderation`. All handlers require moderator auth
/// via their `AuthModerator` extractor.
///
/// ```text
/// GET    /queue                      -> queue
/// GET    /characters                 -> list (?status=&limit=&offset=)
/// GET    /characters/{id}            -> get_by_id
/// POST   /characters/{id}/approve    -> approve
/// POST   /characters/{id}/reject     -> reject
/// DELETE /characters/{id}            -> delete
/// GET    /counts                     -> counts
/// GET    /events                     -> list_events
///
/// GET    /api-keys                   -> list
/// POST   /api-keys                   -> create
/// DELETE /api-keys/{id}              -> revoke
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/queue", get(moderation::queue))
        .route("/characters", get(moderation::list))
        .route(
            "/characters/{id}",
            get(moderation::get_by_id).delete(moderation::delete),
        )
        .route("/characters/{id}/approve", post(moderation::approve))
        .route("/characters/{id}/reject", post(moderation::reject))
        .route("/counts", get(moderation::counts))
        .route("/events", get(moderation::list_events))
        .route("/api-keys", get(api_keys::list).post(api_keys::create))
        .route("/api-keys/{id}", delete(api_keys::revoke))
}
