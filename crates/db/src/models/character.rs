//! Character entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tavern_core::types::{DbId, Timestamp};

/// A character row from the `characters` table.
///
/// `slug` is assigned inside the create transaction, so every committed
/// row has one; it doubles as the profile page filename stem.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub name: String,
    pub player_name: String,
    pub ancestry: String,
    pub class: String,
    pub level: i32,
    pub alignment: Option<String>,
    pub backstory: String,
    pub appearance: Option<String>,
    pub skills: Vec<String>,
    pub inventory: Vec<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub slug: String,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /moderation/characters/{id}/reject`.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectRequest {
    /// Optional human-readable reason shown to the submitter.
    pub reason: Option<String>,
}

/// Per-status counts for the moderation panel header.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}
