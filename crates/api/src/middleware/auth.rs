//! Moderator authentication extractor for Axum handlers.
//!
//! The moderation surface accepts two credential forms:
//!
//! - `Authorization: Bearer <jwt>` -- issued by `POST /auth/login`.
//! - `X-Api-Key: tvk_...` -- long-lived keys for panel scripts.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tavern_core::error::CoreError;
use tavern_core::types::DbId;
use tavern_db::repositories::ApiKeyRepo;

use crate::auth::api_key::{hash_api_key, KEY_SCHEME_PREFIX};
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated moderator extracted from a request.
///
/// Use this as an extractor parameter in any handler that requires
/// moderator authentication:
///
/// ```ignore
/// async fn my_handler(auth: AuthModerator) -> AppResult<Json<()>> {
///     tracing::info!(moderator_id = auth.moderator_id, via = %auth.via, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthModerator {
    /// The moderator's internal database id. For API keys this is the
    /// moderator that created the key.
    pub moderator_id: DbId,
    /// How the request authenticated, for audit logging
    /// (`"jwt:<username>"` or `"key:<prefix>"`).
    pub via: String,
}

impl FromRequestParts<AppState> for AuthModerator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
        {
            let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;
            return authenticate_jwt(state, token);
        }

        if let Some(key) = parts.headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
            return authenticate_api_key(state, key).await;
        }

        Err(AppError::Core(CoreError::Unauthorized(
            "Missing credentials. Provide a Bearer token or X-Api-Key header".into(),
        )))
    }
}

/// Validate a JWT access token into an [`AuthModerator`].
fn authenticate_jwt(state: &AppState, token: &str) -> Result<AuthModerator, AppError> {
    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(AuthModerator {
        moderator_id: claims.sub,
        via: format!("jwt:{}", claims.username),
    })
}

/// Look up an API key by hash into an [`AuthModerator`].
async fn authenticate_api_key(state: &AppState, key: &str) -> Result<AuthModerator, AppError> {
    let api_key = ApiKeyRepo::find_active_by_hash(&state.pool, &hash_api_key(key))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid or revoked API key".into()))
        })?;

    // Usage stamp is best-effort; an error here must not fail the request.
    if let Err(e) = ApiKeyRepo::touch_last_used(&state.pool, api_key.id).await {
        tracing::warn!(error = %e, api_key_id = api_key.id, "Failed to stamp API key usage");
    }

    Ok(AuthModerator {
        moderator_id: api_key.created_by,
        via: format!("key:{}", api_key.key_prefix),
    })
}

/// Authenticate a bare credential string (used by the WebSocket upgrade,
/// where browser clients can only pass a query parameter).
///
/// API keys are recognized by their `tvk_` prefix; anything else is
/// treated as a JWT.
pub async fn authenticate_credential(
    state: &AppState,
    credential: &str,
) -> Result<AuthModerator, AppError> {
    if credential.starts_with(KEY_SCHEME_PREFIX) {
        authenticate_api_key(state, credential).await
    } else {
        authenticate_jwt(state, credential)
    }
}
