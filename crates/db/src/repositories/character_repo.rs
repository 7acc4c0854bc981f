//! Repository for the `characters` table.

use sqlx::PgPool;
use tavern_core::moderation::{STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED};
use tavern_core::profile::slugify;
use tavern_core::submission::CharacterSubmission;
use tavern_core::types::DbId;

use crate::models::character::{Character, StatusCounts};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, player_name, ancestry, class, level, alignment, backstory, \
     appearance, skills, inventory, status, rejection_reason, slug, reviewed_by, reviewed_at, \
     created_at, updated_at";

/// Provides CRUD and moderation operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new pending character, returning the created row.
    ///
    /// The slug depends on the generated id, so the insert and the slug
    /// update run in one transaction; every committed row has a slug.
    pub async fn create(
        pool: &PgPool,
        input: &CharacterSubmission,
    ) -> Result<Character, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO characters \
                (name, player_name, ancestry, class, level, alignment, backstory, appearance, \
                 skills, inventory) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.player_name)
        .bind(&input.ancestry)
        .bind(&input.class)
        .bind(input.level)
        .bind(&input.alignment)
        .bind(&input.backstory)
        .bind(&input.appearance)
        .bind(&input.skills)
        .bind(&input.inventory)
        .fetch_one(&mut *tx)
        .await?;

        let slug = slugify(id, &input.name);
        let query = format!("UPDATE characters SET slug = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(&slug)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(character)
    }

    /// Find a character by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List approved characters for the public gallery, newest first.
    pub async fn list_approved(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Character>, sqlx::Error> {
        Self::list_by_status(pool, STATUS_APPROVED, limit, offset).await
    }

    /// List characters with the given status, newest first.
    pub async fn list_by_status(
        pool: &PgPool,
        status: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters WHERE status = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List characters of every status, newest first.
    pub async fn list_all(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// The moderation queue: pending characters, oldest first so the
    /// longest-waiting submission is reviewed next.
    pub async fn list_queue(pool: &PgPool) -> Result<Vec<Character>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters WHERE status = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(STATUS_PENDING)
            .fetch_all(pool)
            .await
    }

    /// Record a moderator decision on a pending character.
    ///
    /// The `WHERE status = 'pending'` guard makes the transition atomic:
    /// if two moderators decide concurrently, exactly one update matches
    /// and the other caller gets `None` (the handler turns that into a
    /// conflict or not-found depending on whether the row exists).
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        new_status: &str,
        reviewed_by: DbId,
        rejection_reason: Option<&str>,
    ) -> Result<Option<Character>, sqlx::Error> {
        let query = format!(
            "UPDATE characters SET \
                status = $2, \
                reviewed_by = $3, \
                reviewed_at = NOW(), \
                rejection_reason = $4, \
                updated_at = NOW() \
             WHERE id = $1 AND status = '{STATUS_PENDING}' \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(new_status)
            .bind(reviewed_by)
            .bind(rejection_reason)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a character, returning the removed row so the
    /// caller can clean up its profile page.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("DELETE FROM characters WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Per-status counts for the moderation panel header.
    pub async fn status_counts(pool: &PgPool) -> Result<StatusCounts, sqlx::Error> {
        sqlx::query_as::<_, StatusCounts>(
            "SELECT \
                COUNT(*) FILTER (WHERE status = $1) AS pending, \
                COUNT(*) FILTER (WHERE status = $2) AS approved, \
                COUNT(*) FILTER (WHERE status = $3) AS rejected \
             FROM characters",
        )
        .bind(STATUS_PENDING)
        .bind(STATUS_APPROVED)
        .bind(STATUS_REJECTED)
        .fetch_one(pool)
        .await
    }
}
