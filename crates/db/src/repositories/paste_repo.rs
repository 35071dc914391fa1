//! Repository for the `pastebin` table.
//!
//! Rows are written once and never updated; they leave the table either
//! one at a time (expired paste hit on read) or in bulk (expiry sweep).

use labkit_core::paste::Paste;
use labkit_core::types::Timestamp;
use sqlx::SqlitePool;

use crate::models::paste::PasteRow;

/// Column list for `pastebin` queries.
const COLUMNS: &str = "id, content, content_type, created_at, expires_at";

/// Provides query operations for pastes.
pub struct PasteRepo;

impl PasteRepo {
    /// Insert a paste. A duplicate ID fails on the primary key rather than
    /// overwriting the existing row.
    pub async fn insert(pool: &SqlitePool, paste: &Paste) -> Result<(), sqlx::Error> {
        let query = format!("INSERT INTO pastebin ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)");
        sqlx::query(&query)
            .bind(&paste.id)
            .bind(&paste.content)
            .bind(&paste.content_type)
            .bind(paste.created_at)
            .bind(paste.expires_at)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Find a paste by ID regardless of expiry.
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<PasteRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pastebin WHERE id = ?1");
        sqlx::query_as::<_, PasteRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a paste if it exists. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pastebin WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every paste that expired before `cutoff`.
    ///
    /// Runs in a transaction: either the whole batch commits or, on error,
    /// the transaction is rolled back when dropped and nothing is removed.
    /// Returns the number of rows deleted.
    pub async fn delete_expired(pool: &SqlitePool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = sqlx::query("DELETE FROM pastebin WHERE expires_at < ?1")
            .bind(cutoff)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pastebin")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
