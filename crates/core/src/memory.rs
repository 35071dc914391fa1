//! In-process implementations of the persistence traits.
//!
//! Used by unit tests and anywhere a throwaway store is enough. Each call
//! takes a single lock, which gives the same per-call atomicity the SQL
//! backend provides.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::StorageError;
use crate::inventory::{InventoryItem, InventoryStore, NewInventoryItem, UpdateInventoryItem};
use crate::paste::{Paste, PasteStore};
use crate::types::{DbId, Timestamp};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|_| StorageError::Backend("in-memory store lock poisoned".into()))
}

// ---------------------------------------------------------------------------
// Pastes
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryPasteStore {
    pastes: Mutex<HashMap<String, Paste>>,
}

impl MemoryPasteStore {
    /// Copy of every stored paste, expired ones included.
    pub fn snapshot(&self) -> Result<Vec<Paste>, StorageError> {
        Ok(lock(&self.pastes)?.values().cloned().collect())
    }
}

#[async_trait]
impl PasteStore for MemoryPasteStore {
    async fn insert(&self, paste: &Paste) -> Result<(), StorageError> {
        let mut pastes = lock(&self.pastes)?;
        if pastes.contains_key(&paste.id) {
            return Err(StorageError::Backend(format!(
                "duplicate paste id {}",
                paste.id
            )));
        }
        pastes.insert(paste.id.clone(), paste.clone());
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<Option<Paste>, StorageError> {
        Ok(lock(&self.pastes)?.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool, StorageError> {
        Ok(lock(&self.pastes)?.remove(id).is_some())
    }

    async fn delete_expired(&self, cutoff: Timestamp) -> Result<u64, StorageError> {
        let mut pastes = lock(&self.pastes)?;
        let before = pastes.len();
        pastes.retain(|_, p| p.expires_at >= cutoff);
        Ok((before - pastes.len()) as u64)
    }

    async fn count(&self) -> Result<i64, StorageError> {
        Ok(lock(&self.pastes)?.len() as i64)
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct InventoryTable {
    rows: BTreeMap<DbId, InventoryItem>,
    last_id: DbId,
}

#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    table: Mutex<InventoryTable>,
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn list(&self) -> Result<Vec<InventoryItem>, StorageError> {
        Ok(lock(&self.table)?.rows.values().cloned().collect())
    }

    async fn insert(&self, item: &NewInventoryItem) -> Result<InventoryItem, StorageError> {
        let mut table = lock(&self.table)?;
        table.last_id += 1;
        let row = InventoryItem {
            id: table.last_id,
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price,
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: DbId,
        patch: &UpdateInventoryItem,
    ) -> Result<Option<InventoryItem>, StorageError> {
        let mut table = lock(&self.table)?;
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            row.name = name.clone();
        }
        if let Some(quantity) = patch.quantity {
            row.quantity = quantity;
        }
        if let Some(price) = patch.price {
            row.price = price;
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, StorageError> {
        Ok(lock(&self.table)?.rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, StorageError> {
        Ok(lock(&self.table)?.rows.len() as i64)
    }
}
