//! Inventory items: direct CRUD over an injected [`InventoryStore`].
//!
//! No lifecycle beyond create/update/delete. Validation of request payloads
//! happens here so every storage backend sees only complete records.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, StorageError};
use crate::types::DbId;

/// Entity name reported in [`CoreError::NotFound`].
const ENTITY: &str = "Item";

/// Message for a create payload lacking any of the three fields.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields (name, quantity, price)";

/// Message for an update payload with no recognised fields.
pub const EMPTY_UPDATE_MESSAGE: &str = "No data provided";

// ---------------------------------------------------------------------------
// Entity and DTOs
// ---------------------------------------------------------------------------

/// A persisted inventory item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    pub id: DbId,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// A validated item ready for insertion; the id comes from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInventoryItem {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Create payload. Fields are optional so that absence is reported as a
/// validation failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateInventoryItem {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required)]
    pub quantity: Option<i64>,
    #[validate(required)]
    pub price: Option<f64>,
}

/// Partial update payload. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInventoryItem {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    /// Keys that are not item fields. They count toward a non-empty body
    /// and are otherwise ignored.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, IgnoredAny>,
}

impl UpdateInventoryItem {
    /// True when the payload carried no keys at all (`{}`).
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.unknown.is_empty()
    }
}

impl CreateInventoryItem {
    /// Check the payload and turn it into a [`NewInventoryItem`].
    pub fn into_new_item(self) -> Result<NewInventoryItem, CoreError> {
        self.validate().map_err(validation_error)?;
        match (self.name, self.quantity, self.price) {
            (Some(name), Some(quantity), Some(price)) => Ok(NewInventoryItem {
                name,
                quantity,
                price,
            }),
            _ => Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.into())),
        }
    }
}

/// Collapse `validator` output into one client-facing message.
fn validation_error(errors: ValidationErrors) -> CoreError {
    let missing = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .any(|e| e.code == "required");
    if missing {
        CoreError::Validation(MISSING_FIELDS_MESSAGE.into())
    } else {
        CoreError::Validation("name must not be empty".into())
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Storage for inventory items. Every mutation commits on its own.
#[async_trait]
pub trait InventoryStore: Send + Sync + 'static {
    /// All items, ordered by id ascending.
    async fn list(&self) -> Result<Vec<InventoryItem>, StorageError>;

    async fn insert(&self, item: &NewInventoryItem) -> Result<InventoryItem, StorageError>;

    /// Apply the supplied fields in one statement. `None` if `id` does not exist.
    async fn update(
        &self,
        id: DbId,
        patch: &UpdateInventoryItem,
    ) -> Result<Option<InventoryItem>, StorageError>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, StorageError>;

    async fn count(&self) -> Result<i64, StorageError>;
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<InventoryItem>, CoreError> {
        Ok(self.store.list().await?)
    }

    pub async fn create(&self, input: CreateInventoryItem) -> Result<InventoryItem, CoreError> {
        let item = input.into_new_item()?;
        let created = self.store.insert(&item).await?;
        tracing::debug!(item_id = created.id, name = %created.name, "Inventory item created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: DbId,
        patch: UpdateInventoryItem,
    ) -> Result<InventoryItem, CoreError> {
        if patch.is_empty() {
            return Err(CoreError::Validation(EMPTY_UPDATE_MESSAGE.into()));
        }
        patch.validate().map_err(validation_error)?;

        self.store
            .update(id, &patch)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        if self.store.delete(id).await? {
            tracing::debug!(item_id = id, "Inventory item deleted");
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    pub async fn count(&self) -> Result<i64, CoreError> {
        Ok(self.store.count().await?)
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: ENTITY,
        id: id.to_string(),
    }
}
