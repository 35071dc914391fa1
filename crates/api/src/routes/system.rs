//! Route definitions for the operational endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::system;
use crate::state::AppState;

/// ```text
/// GET    /              -> index
/// GET    /hello         -> hello
/// GET    /environment   -> environment
/// POST   /log           -> trigger_log
/// POST   /crash         -> crash        (only when `enable_crash` is set)
/// ```
pub fn router(enable_crash: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/", get(system::index))
        .route("/hello", get(system::hello))
        .route("/environment", get(system::environment))
        .route("/log", post(system::trigger_log));

    if enable_crash {
        tracing::warn!("Crash endpoint enabled: POST /crash terminates the process");
        router.route("/crash", post(system::crash))
    } else {
        router
    }
}
