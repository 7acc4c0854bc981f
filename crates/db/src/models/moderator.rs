//! Moderator account model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use tavern_core::types::{DbId, Timestamp};

/// A moderator row from the `moderators` table.
///
/// **Note:** `password_hash` is never serialized to responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Moderator {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a moderator account (startup bootstrap and tests).
#[derive(Debug, Clone)]
pub struct CreateModerator {
    pub username: String,
    /// Argon2id PHC hash, never the plaintext password.
    pub password_hash: String,
    pub display_name: String,
}
