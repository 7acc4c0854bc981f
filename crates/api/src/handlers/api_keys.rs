//! Handlers for moderator API key management.
//!
//! Keys authenticate panel scripts and automation against the
//! moderation endpoints. The plaintext key is returned exactly once on
//! creation; only its SHA-256 hash is stored.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use tavern_core::error::CoreError;
use tavern_core::sanitize::sanitize_line;
use tavern_core::types::DbId;
use tavern_db::models::api_key::{ApiKeyCreatedResponse, CreateApiKey};
use tavern_db::repositories::ApiKeyRepo;

use crate::auth::api_key::generate_api_key;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthModerator;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/moderation/api-keys
///
/// Create a new API key owned by the authenticated moderator.
pub async fn create(
    auth: AuthModerator,
    State(state): State<AppState>,
    Json(input): Json<CreateApiKey>,
) -> AppResult<impl IntoResponse> {
    let name = sanitize_line(&input.name);
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "API key name must not be empty".into(),
        )));
    }

    let (plaintext, hash, prefix) = generate_api_key();
    let key = ApiKeyRepo::create(&state.pool, &name, &hash, &prefix, auth.moderator_id).await?;

    tracing::info!(
        moderator_id = auth.moderator_id,
        api_key_id = key.id,
        key_prefix = %key.key_prefix,
        "API key created"
    );

    let response = ApiKeyCreatedResponse {
        id: key.id,
        name: key.name,
        key_prefix: key.key_prefix,
        plaintext_key: plaintext,
        created_at: key.created_at,
    };

    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/moderation/api-keys
///
/// List all keys (hashes never serialize).
pub async fn list(
    _auth: AuthModerator,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let keys = ApiKeyRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: keys }))
}

/// DELETE /api/v1/moderation/api-keys/{id}
///
/// Revoke a key. Revocation takes effect on the next request that
/// presents it.
pub async fn revoke(
    auth: AuthModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let revoked = ApiKeyRepo::revoke(&state.pool, id).await?;
    if revoked {
        tracing::info!(moderator_id = auth.moderator_id, api_key_id = id, "API key revoked");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ApiKey",
            id,
        }))
    }
}
