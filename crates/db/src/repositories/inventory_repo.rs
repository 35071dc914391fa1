//! Repository for the `inventory` table.

use labkit_core::inventory::{NewInventoryItem, UpdateInventoryItem};
use labkit_core::types::DbId;
use sqlx::SqlitePool;

use crate::models::inventory::InventoryRow;

/// Column list for `inventory` queries.
const COLUMNS: &str = "id, name, quantity, price";

/// Provides CRUD operations for inventory items.
pub struct InventoryRepo;

impl InventoryRepo {
    /// List all items, oldest first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<InventoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory ORDER BY id ASC");
        sqlx::query_as::<_, InventoryRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find an item by its ID.
    pub async fn find_by_id(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<InventoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM inventory WHERE id = ?1");
        sqlx::query_as::<_, InventoryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new item, returning the row with its assigned ID.
    pub async fn create(
        pool: &SqlitePool,
        item: &NewInventoryItem,
    ) -> Result<InventoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory (name, quantity, price) \
             VALUES (?1, ?2, ?3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryRow>(&query)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(pool)
            .await
    }

    /// Partially update an item.
    ///
    /// Uses `COALESCE` so only provided fields are changed. Returns `None`
    /// if no row has the given ID.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        patch: &UpdateInventoryItem,
    ) -> Result<Option<InventoryRow>, sqlx::Error> {
        let query = format!(
            "UPDATE inventory SET \
                 name = COALESCE(?2, name), \
                 quantity = COALESCE(?3, quantity), \
                 price = COALESCE(?4, price) \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InventoryRow>(&query)
            .bind(id)
            .bind(&patch.name)
            .bind(patch.quantity)
            .bind(patch.price)
            .fetch_optional(pool)
            .await
    }

    /// Delete an item by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inventory WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM inventory")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
