//! Paste lifecycle: identity, TTL assignment, expiry-aware reads, and the
//! bulk expiry sweep.
//!
//! A paste is either live or gone. The transition is a pure function of the
//! clock against the stored `expires_at`; nothing updates a paste after it
//! is inserted. Dead rows are removed lazily when a read hits them, and in
//! bulk by [`PasteManager::sweep`], which catches pastes that are never read.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use serde::Deserialize;

use crate::error::{CoreError, StorageError};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lifetime of every paste, measured from creation. Not configurable per request.
pub const PASTE_TTL_HOURS: i64 = 24;

/// Content type used when the creator does not supply one.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Length of a paste id: 128 random bits as lowercase hex.
pub const PASTE_ID_LEN: usize = 32;

/// Entity name reported in [`CoreError::NotFound`].
const ENTITY: &str = "Paste";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A stored paste.
#[derive(Debug, Clone, PartialEq)]
pub struct Paste {
    pub id: String,
    pub content: String,
    pub content_type: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

impl Paste {
    /// A paste is readable only while `expires_at` is strictly after `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// Payload for creating a paste.
///
/// `text` is optional at the type level so that an absent field reaches
/// [`PasteManager::create`] and is rejected there; an empty string is a
/// valid paste.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePaste {
    pub text: Option<String>,
    pub content_type: Option<String>,
}

/// What the creator gets back.
#[derive(Debug, Clone, PartialEq)]
pub struct PasteRef {
    pub id: String,
    /// Server-relative retrieval path (`/pastebin/{id}`).
    pub path: String,
    pub expires_at: Timestamp,
}

/// The body of a live paste, exactly as it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PasteContent {
    pub content: String,
    pub content_type: String,
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Storage for pastes.
///
/// Each call is atomic with respect to concurrent calls on the same record.
#[async_trait]
pub trait PasteStore: Send + Sync + 'static {
    /// Insert a new paste in a single write.
    async fn insert(&self, paste: &Paste) -> Result<(), StorageError>;

    /// Fetch a paste by id, expired or not.
    async fn find(&self, id: &str) -> Result<Option<Paste>, StorageError>;

    /// Delete a paste if present. Returns `true` if a record was removed;
    /// deleting an id that does not exist is `Ok(false)`, never an error.
    async fn delete(&self, id: &str) -> Result<bool, StorageError>;

    /// Delete every paste whose `expires_at` is strictly before `cutoff`, as
    /// one batch. Returns the number removed.
    async fn delete_expired(&self, cutoff: Timestamp) -> Result<u64, StorageError>;

    /// Number of stored pastes, including expired ones not yet purged.
    async fn count(&self) -> Result<i64, StorageError>;
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate a fresh paste id: a random `u128` rendered as 32 lowercase hex
/// characters. Collisions are negligible, so storage is not consulted.
pub fn generate_paste_id() -> String {
    format!("{:032x}", rand::rng().random::<u128>())
}

/// Retrieval path for a paste id.
pub fn paste_path(id: &str) -> String {
    format!("/pastebin/{id}")
}

/// Render a timestamp as ISO-8601 UTC with microseconds and a literal `Z`,
/// e.g. `2024-01-02T03:04:05.000000Z`.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Resolve the stored content type for a new paste.
///
/// Absent or blank falls back to [`DEFAULT_CONTENT_TYPE`]. Anything else is
/// kept verbatim, but it is echoed back as a header on read, so it must be
/// visible ASCII (spaces and tabs allowed).
fn resolve_content_type(raw: Option<String>) -> Result<String, CoreError> {
    let Some(content_type) = raw.filter(|ct| !ct.trim().is_empty()) else {
        return Ok(DEFAULT_CONTENT_TYPE.to_string());
    };

    let header_safe = content_type
        .bytes()
        .all(|b| b == b'\t' || (0x20..=0x7e).contains(&b));
    if !header_safe {
        return Err(CoreError::Validation(
            "content_type must be printable ASCII".into(),
        ));
    }
    Ok(content_type)
}

// ---------------------------------------------------------------------------
// Manager
// ---------------------------------------------------------------------------

/// Owns paste creation, expiry-aware retrieval, and the expiry sweep.
///
/// Holds no state of its own; every call goes to the injected store. The
/// `*_at` variants take the clock explicitly.
#[derive(Clone)]
pub struct PasteManager {
    store: Arc<dyn PasteStore>,
}

impl PasteManager {
    pub fn new(store: Arc<dyn PasteStore>) -> Self {
        Self { store }
    }

    /// Create a paste expiring [`PASTE_TTL_HOURS`] from now.
    pub async fn create(&self, input: CreatePaste) -> Result<PasteRef, CoreError> {
        self.create_at(input, Utc::now()).await
    }

    pub async fn create_at(
        &self,
        input: CreatePaste,
        now: Timestamp,
    ) -> Result<PasteRef, CoreError> {
        let content = input
            .text
            .ok_or_else(|| CoreError::Validation("Missing required field: text".into()))?;
        let content_type = resolve_content_type(input.content_type)?;

        let paste = Paste {
            id: generate_paste_id(),
            content,
            content_type,
            created_at: now,
            expires_at: now + Duration::hours(PASTE_TTL_HOURS),
        };
        self.store.insert(&paste).await?;

        tracing::debug!(
            paste_id = %paste.id,
            content_type = %paste.content_type,
            expires_at = %format_timestamp(paste.expires_at),
            "Paste created"
        );

        Ok(PasteRef {
            path: paste_path(&paste.id),
            id: paste.id,
            expires_at: paste.expires_at,
        })
    }

    /// Read a live paste.
    ///
    /// Absent and expired pastes both yield [`CoreError::NotFound`]. An
    /// expired record is deleted on the way out; if that delete fails the
    /// failure is logged and the caller still sees `NotFound`.
    pub async fn get(&self, id: &str) -> Result<PasteContent, CoreError> {
        self.get_at(id, Utc::now()).await
    }

    pub async fn get_at(&self, id: &str, now: Timestamp) -> Result<PasteContent, CoreError> {
        let not_found = || CoreError::NotFound {
            entity: ENTITY,
            id: id.to_string(),
        };

        let paste = self.store.find(id).await?.ok_or_else(not_found)?;

        if paste.is_expired_at(now) {
            match self.store.delete(id).await {
                Ok(_) => tracing::debug!(paste_id = %id, "Deleted expired paste on read"),
                Err(e) => tracing::warn!(
                    paste_id = %id,
                    error = %e,
                    "Failed to delete expired paste on read"
                ),
            }
            return Err(not_found());
        }

        Ok(PasteContent {
            content: paste.content,
            content_type: paste.content_type,
        })
    }

    /// Delete every paste that expired before now. Returns the count removed.
    ///
    /// An error means the batch did not commit; the sweep is safe to retry.
    pub async fn sweep(&self) -> Result<u64, CoreError> {
        self.sweep_at(Utc::now()).await
    }

    pub async fn sweep_at(&self, now: Timestamp) -> Result<u64, CoreError> {
        let deleted = self.store.delete_expired(now).await?;
        if deleted > 0 {
            tracing::info!(deleted, "Swept expired pastes");
        } else {
            tracing::debug!("Paste sweep found nothing to delete");
        }
        Ok(deleted)
    }

    /// Number of stored pastes (live or awaiting purge).
    pub async fn count(&self) -> Result<i64, CoreError> {
        Ok(self.store.count().await?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;
    use crate::memory::MemoryPasteStore;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn text(s: &str) -> CreatePaste {
        CreatePaste {
            text: Some(s.to_string()),
            content_type: None,
        }
    }

    fn manager() -> (PasteManager, Arc<MemoryPasteStore>) {
        let store = Arc::new(MemoryPasteStore::default());
        (PasteManager::new(store.clone()), store)
    }

    /// Store whose deletes always fail, to exercise best-effort lazy cleanup.
    struct DeleteFails(MemoryPasteStore);

    #[async_trait]
    impl PasteStore for DeleteFails {
        async fn insert(&self, paste: &Paste) -> Result<(), StorageError> {
            self.0.insert(paste).await
        }
        async fn find(&self, id: &str) -> Result<Option<Paste>, StorageError> {
            self.0.find(id).await
        }
        async fn delete(&self, _id: &str) -> Result<bool, StorageError> {
            Err(StorageError::Backend("disk full".into()))
        }
        async fn delete_expired(&self, _cutoff: Timestamp) -> Result<u64, StorageError> {
            Err(StorageError::Backend("disk full".into()))
        }
        async fn count(&self) -> Result<i64, StorageError> {
            self.0.count().await
        }
    }

    #[tokio::test]
    async fn create_sets_ttl_and_hex_id() {
        let (mgr, store) = manager();
        let created = mgr.create_at(text("hello"), t0()).await.unwrap();

        assert_eq!(created.id.len(), PASTE_ID_LEN);
        assert!(created
            .id
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(created.path, format!("/pastebin/{}", created.id));
        assert_eq!(created.expires_at, t0() + Duration::hours(24));

        let stored = store.find(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.created_at, t0());
        assert_eq!(stored.expires_at - stored.created_at, Duration::hours(24));
    }

    #[tokio::test]
    async fn create_without_text_is_rejected_and_stores_nothing() {
        let (mgr, store) = manager();
        let result = mgr.create_at(CreatePaste::default(), t0()).await;

        assert_matches!(result, Err(CoreError::Validation(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_text_is_a_valid_paste() {
        let (mgr, _) = manager();
        let created = mgr.create_at(text(""), t0()).await.unwrap();
        let read = mgr.get_at(&created.id, t0()).await.unwrap();
        assert_eq!(read.content, "");
    }

    #[tokio::test]
    async fn content_type_defaults_and_is_echoed_verbatim() {
        let (mgr, _) = manager();

        let plain = mgr.create_at(text("a"), t0()).await.unwrap();
        let blank = mgr
            .create_at(
                CreatePaste {
                    text: Some("b".into()),
                    content_type: Some("   ".into()),
                },
                t0(),
            )
            .await
            .unwrap();
        let json = mgr
            .create_at(
                CreatePaste {
                    text: Some("{}".into()),
                    content_type: Some("application/json; charset=utf-8".into()),
                },
                t0(),
            )
            .await
            .unwrap();

        assert_eq!(
            mgr.get_at(&plain.id, t0()).await.unwrap().content_type,
            "text/plain"
        );
        assert_eq!(
            mgr.get_at(&blank.id, t0()).await.unwrap().content_type,
            "text/plain"
        );
        assert_eq!(
            mgr.get_at(&json.id, t0()).await.unwrap().content_type,
            "application/json; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn content_type_with_control_characters_is_rejected() {
        let (mgr, _) = manager();
        let result = mgr
            .create_at(
                CreatePaste {
                    text: Some("x".into()),
                    content_type: Some("text/plain\r\nX-Injected: 1".into()),
                },
                t0(),
            )
            .await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn live_paste_reads_back_unchanged() {
        let (mgr, _) = manager();
        let body = "line one\nline two\t\u{1f600}";
        let created = mgr.create_at(text(body), t0()).await.unwrap();

        let just_before = created.expires_at - Duration::microseconds(1);
        let read = mgr.get_at(&created.id, just_before).await.unwrap();
        assert_eq!(read.content, body);
        assert_eq!(read.content_type, "text/plain");
    }

    #[tokio::test]
    async fn paste_is_gone_at_its_expiry_instant() {
        let (mgr, _) = manager();
        let created = mgr.create_at(text("bye"), t0()).await.unwrap();

        let result = mgr.get_at(&created.id, created.expires_at).await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "Paste", .. }));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let (mgr, _) = manager();
        let result = mgr.get_at(&generate_paste_id(), t0()).await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn reading_expired_paste_deletes_it() {
        let (mgr, store) = manager();
        let created = mgr.create_at(text("old"), t0()).await.unwrap();
        let later = t0() + Duration::hours(25);

        assert_matches!(
            mgr.get_at(&created.id, later).await,
            Err(CoreError::NotFound { .. })
        );
        assert!(store.find(&created.id).await.unwrap().is_none());

        // Already removed by the read, so the sweep does not count it again.
        assert_eq!(mgr.sweep_at(later).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn earlier_read_does_not_extend_lifetime() {
        let (mgr, store) = manager();
        let created = mgr.create_at(text("seen"), t0()).await.unwrap();

        assert_eq!(mgr.get_at(&created.id, t0()).await.unwrap().content, "seen");

        assert_matches!(
            mgr.get_at(&created.id, created.expires_at).await,
            Err(CoreError::NotFound { entity: "Paste", .. })
        );
        assert!(store.find(&created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_lazy_delete_still_reports_not_found() {
        let store = Arc::new(DeleteFails(MemoryPasteStore::default()));
        let mgr = PasteManager::new(store.clone());
        let created = mgr.create_at(text("stuck"), t0()).await.unwrap();

        let result = mgr.get_at(&created.id, t0() + Duration::days(2)).await;
        assert_matches!(result, Err(CoreError::NotFound { .. }));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_and_is_idempotent() {
        let (mgr, store) = manager();
        let old_a = mgr.create_at(text("a"), t0()).await.unwrap();
        let old_b = mgr.create_at(text("b"), t0()).await.unwrap();
        let fresh = mgr
            .create_at(text("c"), t0() + Duration::hours(20))
            .await
            .unwrap();

        let now = t0() + Duration::hours(30);
        assert_eq!(mgr.sweep_at(now).await.unwrap(), 2);
        assert_eq!(mgr.sweep_at(now).await.unwrap(), 0);

        assert!(store.find(&old_a.id).await.unwrap().is_none());
        assert!(store.find(&old_b.id).await.unwrap().is_none());
        assert_eq!(mgr.get_at(&fresh.id, now).await.unwrap().content, "c");
    }

    #[tokio::test]
    async fn sweep_leaves_no_paste_expired_before_sweep_start() {
        let (mgr, store) = manager();
        for h in 0..10 {
            mgr.create_at(text("x"), t0() + Duration::hours(h))
                .await
                .unwrap();
        }

        let now = t0() + Duration::hours(29);
        assert_eq!(mgr.sweep_at(now).await.unwrap(), 5);
        for paste in store.snapshot().unwrap() {
            assert!(paste.expires_at >= now);
        }
    }

    #[tokio::test]
    async fn failed_sweep_surfaces_storage_error() {
        let mgr = PasteManager::new(Arc::new(DeleteFails(MemoryPasteStore::default())));
        assert_matches!(mgr.sweep_at(t0()).await, Err(CoreError::Storage(_)));
    }

    #[test]
    fn generated_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_paste_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| id.len() == PASTE_ID_LEN));
    }

    #[test]
    fn timestamps_render_with_micros_and_z() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(ts), "2024-01-02T03:04:05.000000Z");

        let ts = ts + Duration::microseconds(123_456);
        assert_eq!(format_timestamp(ts), "2024-01-02T03:04:05.123456Z");
    }
}
