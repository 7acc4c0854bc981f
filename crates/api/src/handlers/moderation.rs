//! Handlers for the moderation panel: queue, decisions, deletion, and
//! the activity feed. Every endpoint here requires moderator auth.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use tavern_core::error::CoreError;
use tavern_core::moderation::{can_transition, validate_status, STATUS_APPROVED, STATUS_REJECTED};
use tavern_core::sanitize::sanitize_text;
use tavern_core::types::DbId;
use tavern_db::models::character::{Character, RejectRequest};
use tavern_db::repositories::{CharacterRepo, EventRepo};
use tavern_events::bus::{
    EVENT_CHARACTER_APPROVED, EVENT_CHARACTER_DELETED, EVENT_CHARACTER_REJECTED,
};
use tavern_events::SiteEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthModerator;
use crate::query::Pagination;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /moderation/characters`.
///
/// Flat rather than composing [`Pagination`]: `serde_urlencoded` cannot
/// flatten nested structs.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/moderation/queue
///
/// The pending review queue, oldest submission first.
pub async fn queue(
    _auth: AuthModerator,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    let characters = CharacterRepo::list_queue(&state.pool).await?;
    Ok(Json(DataResponse { data: characters }))
}

/// GET /api/v1/moderation/characters?status=&limit=&offset=
///
/// List characters of any status; moderators see everything.
pub async fn list(
    _auth: AuthModerator,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<Character>>>> {
    let pagination = Pagination {
        limit: query.limit,
        offset: query.offset,
    };

    let characters = match query.status.as_deref() {
        Some(status) => {
            validate_status(status).map_err(CoreError::Validation)?;
            CharacterRepo::list_by_status(&state.pool, status, pagination.limit(), pagination.offset())
                .await?
        }
        None => {
            CharacterRepo::list_all(&state.pool, pagination.limit(), pagination.offset()).await?
        }
    };

    Ok(Json(DataResponse { data: characters }))
}

/// GET /api/v1/moderation/characters/{id}
///
/// Single character of any status.
pub async fn get_by_id(
    _auth: AuthModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Character>>> {
    let character = CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;
    Ok(Json(DataResponse { data: character }))
}

/// POST /api/v1/moderation/characters/{id}/approve
///
/// Approve a pending character: write its profile page, record the
/// decision, and announce it. The page is written before the status
/// commits so a failed write leaves the character pending.
pub async fn approve(
    auth: AuthModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Character>>> {
    let existing = find_or_404(&state, id).await?;
    ensure_pending(&existing, STATUS_APPROVED)?;

    // Render with the decision timestamp the committed row will carry.
    let mut preview = existing.clone();
    preview.reviewed_at = Some(Utc::now());
    state
        .profiles
        .write(&preview)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let character = match CharacterRepo::decide(
        &state.pool,
        id,
        STATUS_APPROVED,
        auth.moderator_id,
        None,
    )
    .await?
    {
        Some(c) => c,
        None => {
            // Another moderator decided first. Only keep the page if the
            // winning decision was also an approval.
            let current = CharacterRepo::find_by_id(&state.pool, id).await?;
            let winner_approved =
                current.as_ref().is_some_and(|c| c.status == STATUS_APPROVED);
            if !winner_approved {
                if let Err(e) = state.profiles.remove(&existing.slug).await {
                    tracing::warn!(error = %e, slug = %existing.slug, "Failed to remove orphaned profile page");
                }
            }
            return Err(concurrent_decision_error(current, id));
        }
    };

    state.event_bus.publish(
        SiteEvent::new(EVENT_CHARACTER_APPROVED)
            .with_source("character", character.id)
            .with_actor(auth.moderator_id)
            .with_payload(serde_json::json!({
                "name": character.name,
                "class": character.class,
                "level": character.level,
                "slug": character.slug,
            })),
    );

    tracing::info!(
        moderator_id = auth.moderator_id,
        character_id = id,
        via = %auth.via,
        "Character approved"
    );

    Ok(Json(DataResponse { data: character }))
}

/// POST /api/v1/moderation/characters/{id}/reject
///
/// Reject a pending character with an optional reason.
pub async fn reject(
    auth: AuthModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectRequest>,
) -> AppResult<Json<DataResponse<Character>>> {
    let existing = find_or_404(&state, id).await?;
    ensure_pending(&existing, STATUS_REJECTED)?;

    let reason = input
        .reason
        .as_deref()
        .map(sanitize_text)
        .filter(|s| !s.is_empty());

    let character = CharacterRepo::decide(
        &state.pool,
        id,
        STATUS_REJECTED,
        auth.moderator_id,
        reason.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(
            "Character was decided by another moderator".into(),
        ))
    })?;

    state.event_bus.publish(
        SiteEvent::new(EVENT_CHARACTER_REJECTED)
            .with_source("character", character.id)
            .with_actor(auth.moderator_id)
            .with_payload(serde_json::json!({
                "name": character.name,
                "reason": character.rejection_reason,
            })),
    );

    tracing::info!(
        moderator_id = auth.moderator_id,
        character_id = id,
        reason = ?character.rejection_reason,
        "Character rejected"
    );

    Ok(Json(DataResponse { data: character }))
}

/// DELETE /api/v1/moderation/characters/{id}
///
/// Permanently delete a character and its profile page (if any).
pub async fn delete(
    auth: AuthModerator,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CharacterRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))?;

    // Page removal is best-effort; the record is already gone.
    if let Err(e) = state.profiles.remove(&deleted.slug).await {
        tracing::warn!(error = %e, slug = %deleted.slug, "Failed to remove profile page");
    }

    state.event_bus.publish(
        SiteEvent::new(EVENT_CHARACTER_DELETED)
            .with_source("character", id)
            .with_actor(auth.moderator_id)
            .with_payload(serde_json::json!({ "name": deleted.name })),
    );

    tracing::info!(
        moderator_id = auth.moderator_id,
        character_id = id,
        "Character deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/moderation/counts
///
/// Per-status totals for the panel header.
pub async fn counts(
    _auth: AuthModerator,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let counts = CharacterRepo::status_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: counts }))
}

/// GET /api/v1/moderation/events?limit=&offset=
///
/// Recent persisted site events for the panel activity feed.
pub async fn list_events(
    _auth: AuthModerator,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<impl IntoResponse> {
    let events =
        EventRepo::list_recent(&state.pool, pagination.limit(), pagination.offset()).await?;
    Ok(Json(DataResponse { data: events }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a character or return 404.
async fn find_or_404(state: &AppState, id: DbId) -> AppResult<Character> {
    CharacterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }))
}

/// Return 409 when a decision would re-decide a settled character.
fn ensure_pending(character: &Character, target: &str) -> Result<(), AppError> {
    if can_transition(&character.status, target) {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Conflict(format!(
            "Character is already {}",
            character.status
        ))))
    }
}

/// Build the error for a decision lost to a concurrent moderator.
fn concurrent_decision_error(current: Option<Character>, id: DbId) -> AppError {
    match current {
        Some(c) => AppError::Core(CoreError::Conflict(format!(
            "Character was decided by another moderator (now {})",
            c.status
        ))),
        None => AppError::Core(CoreError::NotFound {
            entity: "Character",
            id,
        }),
    }
}
