//! Route definitions for the `/database` inventory resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// ```text
/// GET    /database/       -> list_items
/// POST   /database/       -> create_item
/// PUT    /database/{id}   -> update_item
/// DELETE /database/{id}   -> delete_item
/// ```
///
/// The collection is also reachable without the trailing slash.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/database/",
            get(inventory::list_items).post(inventory::create_item),
        )
        .route(
            "/database",
            get(inventory::list_items).post(inventory::create_item),
        )
        .route(
            "/database/{id}",
            put(inventory::update_item).delete(inventory::delete_item),
        )
}
