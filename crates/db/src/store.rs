//! Adapter from the repositories to the core persistence traits.

use async_trait::async_trait;
use labkit_core::error::StorageError;
use labkit_core::inventory::{InventoryItem, InventoryStore, NewInventoryItem, UpdateInventoryItem};
use labkit_core::paste::{Paste, PasteStore};
use labkit_core::types::{DbId, Timestamp};

use crate::repositories::{InventoryRepo, PasteRepo};
use crate::{storage_error, DbPool};

/// SQLite-backed implementation of [`PasteStore`] and [`InventoryStore`].
///
/// Cheap to clone; wraps the shared connection pool.
#[derive(Debug, Clone)]
pub struct SqlStore {
    pool: DbPool,
}

impl SqlStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PasteStore for SqlStore {
    async fn insert(&self, paste: &Paste) -> Result<(), StorageError> {
        PasteRepo::insert(&self.pool, paste)
            .await
            .map_err(storage_error)
    }

    async fn find(&self, id: &str) -> Result<Option<Paste>, StorageError> {
        let row = PasteRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage_error)?;
        Ok(row.map(Paste::from))
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        PasteRepo::delete(&self.pool, id)
            .await
            .map_err(storage_error)
    }

    async fn delete_expired(&self, cutoff: Timestamp) -> Result<u64, StorageError> {
        PasteRepo::delete_expired(&self.pool, cutoff)
            .await
            .map_err(storage_error)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        PasteRepo::count(&self.pool).await.map_err(storage_error)
    }
}

#[async_trait]
impl InventoryStore for SqlStore {
    async fn list(&self) -> Result<Vec<InventoryItem>, StorageError> {
        let rows = InventoryRepo::list(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }

    async fn insert(&self, item: &NewInventoryItem) -> Result<InventoryItem, StorageError> {
        let row = InventoryRepo::create(&self.pool, item)
            .await
            .map_err(storage_error)?;
        Ok(row.into())
    }

    async fn update(
        &self,
        id: DbId,
        patch: &UpdateInventoryItem,
    ) -> Result<Option<InventoryItem>, StorageError> {
        let row = InventoryRepo::update(&self.pool, id, patch)
            .await
            .map_err(storage_error)?;
        Ok(row.map(InventoryItem::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StorageError> {
        InventoryRepo::delete(&self.pool, id)
            .await
            .map_err(storage_error)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        InventoryRepo::count(&self.pool)
            .await
            .map_err(storage_error)
    }
}
