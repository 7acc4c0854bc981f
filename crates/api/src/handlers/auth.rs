//! Handlers for the `/auth` resource (login, identity echo).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use tavern_core::error::CoreError;
use tavern_core::types::DbId;
use tavern_db::models::moderator::Moderator;
use tavern_db::repositories::ModeratorRepo;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthModerator;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub moderator: ModeratorInfo,
}

/// Public moderator info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct ModeratorInfo {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns a JWT access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let moderator = ModeratorRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    if !moderator.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &moderator.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::warn!(username = %input.username, "Failed login attempt");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    ModeratorRepo::record_login(&state.pool, moderator.id).await?;

    let access_token = generate_access_token(moderator.id, &moderator.username, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(moderator_id = moderator.id, username = %moderator.username, "Moderator logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        moderator: ModeratorInfo {
            id: moderator.id,
            username: moderator.username,
            display_name: moderator.display_name,
        },
    }))
}

/// GET /api/v1/auth/me
///
/// Echo the authenticated moderator's account record.
pub async fn me(
    auth: AuthModerator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Moderator>>> {
    let moderator = ModeratorRepo::find_by_id(&state.pool, auth.moderator_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Moderator",
            id: auth.moderator_id,
        }))?;
    Ok(Json(DataResponse { data: moderator }))
}
