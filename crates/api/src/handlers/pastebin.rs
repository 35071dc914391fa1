//! Handlers for the `/pastebin` resource.
//!
//! Create a paste, read it back with its original content type, and purge
//! expired pastes on demand.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use labkit_core::paste::{format_timestamp, CreatePaste};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatePasteResponse {
    pub id: String,
    pub url: String,
    /// ISO-8601 UTC with a trailing `Z`.
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub message: String,
    pub count: u64,
}

/// POST /pastebin
///
/// Body: `{"text": "...", "content_type": "..."}`; `content_type` defaults
/// to `text/plain`. Every paste lives for 24 hours.
pub async fn create_paste(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(input): JsonBody<CreatePaste>,
) -> AppResult<(StatusCode, Json<CreatePasteResponse>)> {
    let created = state.pastes.create(input).await?;
    let url = paste_url(&state.config, &headers, &created.path);
    tracing::info!(paste_id = %created.id, "Paste stored");

    Ok((
        StatusCode::CREATED,
        Json(CreatePasteResponse {
            id: created.id,
            url,
            expires_at: format_timestamp(created.expires_at),
        }),
    ))
}

/// GET /pastebin/{id}
///
/// Returns the raw content with its stored content type. Missing and
/// expired pastes are both a plain 404.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let paste = state.pastes.get(&id).await?;
    let content_type = HeaderValue::from_str(&paste.content_type).map_err(|e| {
        AppError::InternalError(format!("stored content type for paste {id} is invalid: {e}"))
    })?;

    Ok(([(CONTENT_TYPE, content_type)], paste.content).into_response())
}

/// POST /pastebin/cleanup
pub async fn cleanup(State(state): State<AppState>) -> AppResult<Json<CleanupResponse>> {
    let count = state.pastes.sweep().await?;
    Ok(Json(CleanupResponse {
        message: format!("Removed {count} expired pastes"),
        count,
    }))
}

/// Absolute URL for a paste path.
///
/// Prefers the configured public base URL, then the request's `Host`
/// header, and falls back to the bare path.
fn paste_url(config: &ServerConfig, headers: &HeaderMap, path: &str) -> String {
    if let Some(base) = &config.public_base_url {
        return format!("{base}{path}");
    }
    match headers.get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{host}{path}"),
        None => path.to_string(),
    }
}
