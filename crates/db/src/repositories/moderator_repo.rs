//! Repository for the `moderators` table.

use sqlx::PgPool;
use tavern_core::types::DbId;

use crate::models::moderator::{CreateModerator, Moderator};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, username, password_hash, display_name, is_active, last_login_at, created_at, updated_at";

/// Provides account lookup and bootstrap operations for moderators.
pub struct ModeratorRepo;

impl ModeratorRepo {
    /// Insert a new moderator account, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateModerator) -> Result<Moderator, sqlx::Error> {
        let query = format!(
            "INSERT INTO moderators (username, password_hash, display_name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Moderator>(&query)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// Find a moderator by username.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Moderator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM moderators WHERE username = $1");
        sqlx::query_as::<_, Moderator>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a moderator by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Moderator>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM moderators WHERE id = $1");
        sqlx::query_as::<_, Moderator>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `last_login_at` after a successful login.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE moderators SET last_login_at = NOW(), updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Whether any moderator account exists (used by the startup bootstrap).
    pub async fn any_exist(pool: &PgPool) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM moderators)")
            .fetch_one(pool)
            .await
    }
}
