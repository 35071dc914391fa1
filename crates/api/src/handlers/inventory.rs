//! Handlers for the `/database` inventory resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use labkit_core::error::CoreError;
use labkit_core::inventory::{CreateInventoryItem, InventoryItem, UpdateInventoryItem};
use labkit_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /database/
pub async fn list_items(State(state): State<AppState>) -> AppResult<Json<Vec<InventoryItem>>> {
    let items = state.inventory.list().await?;
    tracing::debug!(count = items.len(), "Fetched inventory");
    Ok(Json(items))
}

/// POST /database/
///
/// Requires `name`, `quantity` and `price`; a missing field is a 400 and
/// nothing is written.
pub async fn create_item(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateInventoryItem>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    let item = state.inventory.create(input).await?;
    tracing::info!(item_id = item.id, "Inventory item added");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /database/{id}
///
/// Partial update: fields absent from the body keep their current value.
pub async fn update_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    JsonBody(patch): JsonBody<UpdateInventoryItem>,
) -> AppResult<Json<InventoryItem>> {
    let id = parse_item_id(&raw_id)?;
    let item = state.inventory.update(id, patch).await?;
    tracing::info!(item_id = id, "Inventory item updated");
    Ok(Json(item))
}

/// DELETE /database/{id}
pub async fn delete_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_item_id(&raw_id)?;
    state.inventory.delete(id).await?;
    tracing::info!(item_id = id, "Inventory item deleted");
    Ok(Json(MessageResponse {
        message: "Item deleted",
    }))
}

/// A path segment that is not an integer cannot name an item.
fn parse_item_id(raw: &str) -> AppResult<DbId> {
    raw.parse().map_err(|_| {
        CoreError::NotFound {
            entity: "Item",
            id: raw.to_string(),
        }
        .into()
    })
}
