use std::sync::Arc;

use labkit_core::inventory::InventoryService;
use labkit_core::paste::PasteManager;
use labkit_db::{DbPool, SqlStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Paste lifecycle manager.
    pub pastes: PasteManager,
    /// Inventory CRUD service.
    pub inventory: InventoryService,
}

impl AppState {
    /// Wire both services to a SQLite-backed store over `pool`.
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        let store = Arc::new(SqlStore::new(pool));
        Self {
            config: Arc::new(config),
            pastes: PasteManager::new(store.clone()),
            inventory: InventoryService::new(store),
        }
    }
}
