//! Operational endpoints: greeting, environment dump, log trigger, crash,
//! and the plain-text index.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;

/// Delay between answering `/crash` and exiting, so the response gets out.
const CRASH_DELAY: Duration = Duration::from_millis(200);

const INDEX_TEXT: &str = "\
Lab kit API

GET    /database/          list inventory items
POST   /database/          add an item {name, quantity, price}
PUT    /database/{id}      update an item (any subset of fields)
DELETE /database/{id}      delete an item
GET    /healthcheck        database connectivity and table counts
GET    /environment        process environment variables
GET    /hello              greeting
POST   /log                emit a log line {level, message}
POST   /crash              terminate the process (only when enabled)
POST   /pastebin           store text for 24 hours {text, content_type?}
GET    /pastebin/{id}      read a paste
POST   /pastebin/cleanup   delete expired pastes
";

/// GET /
pub async fn index() -> &'static str {
    INDEX_TEXT
}

/// GET /hello
pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello, World!" }))
}

/// GET /environment
///
/// Every variable visible to the process, sorted by name. Non-UTF-8 names
/// or values are converted lossily.
pub async fn environment() -> Json<BTreeMap<String, String>> {
    let vars = std::env::vars_os()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect();
    Json(vars)
}

// ---------------------------------------------------------------------------
// Log trigger
// ---------------------------------------------------------------------------

/// Levels accepted by `POST /log`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Case-insensitive parse of `debug`, `info`, `warning`, `error`, `critical`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Emit `message` through `tracing` at this level. `critical` has no
    /// tracing equivalent and goes out at error level, flagged.
    fn emit(self, message: &str) {
        match self {
            Self::Debug => tracing::debug!(source = "log_endpoint", "{message}"),
            Self::Info => tracing::info!(source = "log_endpoint", "{message}"),
            Self::Warning => tracing::warn!(source = "log_endpoint", "{message}"),
            Self::Error => tracing::error!(source = "log_endpoint", "{message}"),
            Self::Critical => {
                tracing::error!(source = "log_endpoint", critical = true, "{message}")
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub level: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub status: &'static str,
    pub level: &'static str,
    pub message: String,
}

/// POST /log
pub async fn trigger_log(JsonBody(input): JsonBody<LogRequest>) -> AppResult<Json<LogResponse>> {
    let raw_level = input
        .level
        .ok_or_else(|| AppError::BadRequest("Missing required field: level".into()))?;
    let level = LogLevel::parse(&raw_level).ok_or_else(|| {
        AppError::BadRequest(
            "Invalid level; expected one of debug, info, warning, error, critical".into(),
        )
    })?;
    let message = input
        .message
        .ok_or_else(|| AppError::BadRequest("Missing required field: message".into()))?;

    level.emit(&message);

    Ok(Json(LogResponse {
        status: "success",
        level: level.as_str(),
        message,
    }))
}

// ---------------------------------------------------------------------------
// Crash
// ---------------------------------------------------------------------------

/// POST /crash
///
/// Only routed when `ENABLE_CRASH_ENDPOINT` is set. Answers 500, then exits
/// the process with status 1.
pub async fn crash() -> (StatusCode, Json<Value>) {
    tracing::error!("Crash requested via /crash, terminating process");
    tokio::spawn(async {
        tokio::time::sleep(CRASH_DELAY).await;
        std::process::exit(1);
    });
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Application crashing" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" Warning "), Some(LogLevel::Warning));
        assert_eq!(LogLevel::parse("critical"), Some(LogLevel::Critical));
    }

    #[test]
    fn rejects_unknown_levels() {
        assert_eq!(LogLevel::parse("warn"), None);
        assert_eq!(LogLevel::parse("trace"), None);
        assert_eq!(LogLevel::parse(""), None);
    }
}
