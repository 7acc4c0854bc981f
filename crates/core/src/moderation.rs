//! Moderation status constants and transition rules.
//!
//! Defines the valid status values for submitted characters and the
//! allowed transitions between them, used by both the DB and API
//! layers.

/// Character is awaiting a moderator decision.
pub const STATUS_PENDING: &str = "pending";

/// Character was approved and has a public profile page.
pub const STATUS_APPROVED: &str = "approved";

/// Character was rejected by a moderator.
pub const STATUS_REJECTED: &str = "rejected";

/// All valid status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_APPROVED, STATUS_REJECTED];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Whether a moderator decision may move a character from `from` to `to`.
///
/// Decisions only apply to pending characters: `pending -> approved` and
/// `pending -> rejected`. A character that has already been decided must
/// be deleted and resubmitted; it cannot be re-decided.
pub fn can_transition(from: &str, to: &str) -> bool {
    from == STATUS_PENDING && (to == STATUS_APPROVED || to == STATUS_REJECTED)
}
