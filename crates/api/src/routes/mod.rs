pub mod health;
pub mod inventory;
pub mod pastebin;
pub mod system;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build every application route.
///
/// All routes are mounted at the root:
///
/// ```text
/// /                    index
/// /healthcheck         health
/// /database/...        inventory CRUD
/// /pastebin/...        pastes
/// /environment, /hello, /log, /crash (opt-in)
/// ```
pub fn app_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(inventory::router())
        .merge(pastebin::router())
        .merge(system::router(config.enable_crash_endpoint))
}
