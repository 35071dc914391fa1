/// Failure reported by a persistence backend.
///
/// The health check distinguishes a missing table from every other
/// backend failure, so that case gets its own variant.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Table missing: {0}")]
    TableMissing(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `entity` is the client-facing noun ("Item", "Paste"); `id` is kept
    /// for server-side logs only.
    #[error("{entity} not found (id {id})")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
