//! Route definitions for the `/pastebin` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::pastebin;
use crate::state::AppState;

/// ```text
/// POST   /pastebin           -> create_paste
/// POST   /pastebin/cleanup   -> cleanup
/// GET    /pastebin/{id}      -> get_paste
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pastebin", post(pastebin::create_paste))
        .route("/pastebin/cleanup", post(pastebin::cleanup))
        .route("/pastebin/{id}", get(pastebin::get_paste))
}
