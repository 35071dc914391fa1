//! SQLite persistence for the lab kit service.
//!
//! Pool setup, embedded migrations, row models, repositories, and the
//! [`SqlStore`] adapter that plugs them into the core persistence traits.

use std::str::FromStr;
use std::time::Duration;

use labkit_core::error::StorageError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

pub mod models;
pub mod repositories;
pub mod store;

pub use store::SqlStore;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from a database URL.
///
/// The database file (and its parent directory) is created if missing.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    if let Some(dir) = options.get_filename().parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            tracing::info!(dir = %dir.display(), "Creating database directory");
            std::fs::create_dir_all(dir)?;
        }
    }

    SqlitePoolOptions::new()
        .max_connections(20)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations, creating the `inventory` and `pastebin`
/// tables if they do not exist.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Translate a sqlx error into the backend-neutral [`StorageError`].
///
/// SQLite reports a dropped or never-created table as `no such table: <name>`;
/// that case is surfaced separately so the health check can name it.
pub fn storage_error(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(table) = db_err.message().strip_prefix("no such table: ") {
            return StorageError::TableMissing(table.to_string());
        }
    }
    StorageError::Backend(err.to_string())
}
