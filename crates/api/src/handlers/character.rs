//! Handlers for the public `/characters` resource.
//!
//! Submission is open to anonymous visitors (rate-limited per IP); the
//! gallery endpoints only ever expose approved characters. Everything
//! else lives under `/moderation`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use tavern_core::error::CoreError;
use tavern_core::moderation::STATUS_APPROVED;
use tavern_core::submission::CharacterSubmission;
use tavern_core::types::DbId;
use tavern_db::models::character::Character;
use tavern_db::repositories::CharacterRepo;
use tavern_events::bus::EVENT_CHARACTER_SUBMITTED;
use tavern_events::SiteEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::rate_limit::ClientIp;
use crate::query::Pagination;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/characters
///
/// Public character sheet submission. The payload is sanitized before
/// validation so limits apply to the cleaned text; the created record
/// always starts out pending.
pub async fn submit(
    State(state): State<AppState>,
    client_ip: ClientIp,
    Json(input): Json<CharacterSubmission>,
) -> AppResult<impl IntoResponse> {
    if !state.rate_limiter.check(&client_ip.0) {
        tracing::warn!(client = %client_ip.0, "Submission rate limit exceeded");
        return Err(AppError::RateLimited);
    }

    let input = input.sanitized();
    input
        .validate()
        .map_err(|e| CoreError::Validation(flatten_validation_errors(&e)))?;

    let character = CharacterRepo::create(&state.pool, &input).await?;

    state.event_bus.publish(
        SiteEvent::new(EVENT_CHARACTER_SUBMITTED)
            .with_source("character", character.id)
            .with_payload(serde_json::json!({
                "name": character.name,
                "class": character.class,
                "level": character.level,
            })),
    );

    tracing::info!(
        character_id = character.id,
        name = %character.name,
        "Character submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: character })))
}

/// GET /api/v1/characters
///
/// Public gallery: approved characters only, newest first.
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    let characters =
        CharacterRepo::list_approved(&state.pool, pagination.limit(), pagination.offset()).await?;
    Ok(Json(DataResponse { data: characters }))
}

/// GET /api/v1/characters/{id}
///
/// Public single-character view. Non-approved characters are reported
/// as not found so their existence is not leaked.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Character>>> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|c| c.status == STATUS_APPROVED)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    Ok(Json(DataResponse { data: character }))
}

/// Collapse `validator` errors into a single human-readable line.
fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors.to_string().replace('\n', "; ")
}
