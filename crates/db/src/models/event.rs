//! Persisted site event model.

use serde::Serialize;
use sqlx::FromRow;
use tavern_core::types::{DbId, Timestamp};

/// A row from the `events` table.
///
/// The event type is stored as its dot-separated name directly; the
/// set of types is a closed list of constants, so there is no lookup
/// table to join against.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_moderator_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
