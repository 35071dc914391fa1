use labkit_core::paste::Paste;
use labkit_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `pastebin` table.
#[derive(Debug, Clone, FromRow)]
pub struct PasteRow {
    pub id: String,
    pub content: String,
    pub content_type: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl From<PasteRow> for Paste {
    fn from(row: PasteRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            content_type: row.content_type,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}
