use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use labkit_core::error::{CoreError, StorageError};
use serde::Serialize;

use crate::state::AppState;

/// Row counts for each table, reported when the database is healthy.
#[derive(Debug, Serialize)]
pub struct TableCounts {
    pub inventory: i64,
    pub pastebin: i64,
}

/// Health check response payload (healthy).
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub counts: TableCounts,
}

/// Health check response payload (unhealthy).
#[derive(Debug, Serialize)]
pub struct HealthFailure {
    pub status: &'static str,
    /// `connected_table_missing` or `connection_error`.
    pub database: &'static str,
    pub details: String,
}

/// GET /healthcheck -- confirms both tables are reachable and counts their rows.
async fn health_check(State(state): State<AppState>) -> Response {
    match table_counts(&state).await {
        Ok(counts) => Json(HealthResponse {
            status: "ok",
            database: "connected_and_table_accessible",
            counts,
        })
        .into_response(),
        Err(CoreError::Storage(StorageError::TableMissing(table))) => {
            tracing::error!(%table, "Health check failed: table missing");
            failure(
                "connected_table_missing",
                format!("Table '{table}' is missing"),
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Health check failed: database error");
            failure("connection_error", "Database is unreachable".to_string())
        }
    }
}

async fn table_counts(state: &AppState) -> Result<TableCounts, CoreError> {
    Ok(TableCounts {
        inventory: state.inventory.count().await?,
        pastebin: state.pastes.count().await?,
    })
}

fn failure(database: &'static str, details: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(HealthFailure {
            status: "error",
            database,
            details,
        }),
    )
        .into_response()
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(health_check))
}
