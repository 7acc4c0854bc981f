//! Repository for the `api_keys` table.

use sqlx::PgPool;
use tavern_core::types::DbId;

use crate::models::api_key::ApiKey;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, key_hash, key_prefix, created_by, is_active, last_used_at, revoked_at, created_at";

/// Provides create/lookup/revoke operations for API keys.
pub struct ApiKeyRepo;

impl ApiKeyRepo {
    /// Insert a new key, returning the created row.
    ///
    /// Only the SHA-256 hash of the key is stored; the caller keeps the
    /// plaintext just long enough to show it once.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        key_hash: &str,
        key_prefix: &str,
        created_by: DbId,
    ) -> Result<ApiKey, sqlx::Error> {
        let query = format!(
            "INSERT INTO api_keys (name, key_hash, key_prefix, created_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(name)
            .bind(key_hash)
            .bind(key_prefix)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    /// Find an active, non-revoked key by its hash.
    pub async fn find_active_by_hash(
        pool: &PgPool,
        key_hash: &str,
    ) -> Result<Option<ApiKey>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM api_keys \
             WHERE key_hash = $1 AND is_active = true AND revoked_at IS NULL"
        );
        sqlx::query_as::<_, ApiKey>(&query)
            .bind(key_hash)
            .fetch_optional(pool)
            .await
    }

    /// List all keys, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ApiKey>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM api_keys ORDER BY created_at DESC");
        sqlx::query_as::<_, ApiKey>(&query).fetch_all(pool).await
    }

    /// Revoke a key. Returns `true` if a live key was revoked.
    pub async fn revoke(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE api_keys SET is_active = false, revoked_at = NOW() \
             WHERE id = $1 AND revoked_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp `last_used_at` after a successful authentication.
    pub async fn touch_last_used(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
