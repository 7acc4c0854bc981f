//! Route definitions for the public `/characters` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// POST /       -> submit (rate-limited per IP)
/// GET  /       -> list_gallery (approved only)
/// GET  /{id}   -> get_by_id (approved only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list_gallery).post(character::submit))
        .route("/{id}", get(character::get_by_id))
}
