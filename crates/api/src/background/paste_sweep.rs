//! Periodic purge of expired pastes.
//!
//! Lazy deletion only removes pastes somebody reads after they expire; this
//! job catches the rest. Runs [`PasteManager::sweep`] on a fixed interval
//! using `tokio::time::interval`; the first sweep happens immediately.

use std::time::Duration;

use labkit_core::paste::PasteManager;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(pastes: PasteManager, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Paste sweep job started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Paste sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                if let Err(e) = pastes.sweep().await {
                    tracing::error!(error = %e, "Paste sweep failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration as ChronoDuration, Utc};
    use labkit_core::memory::MemoryPasteStore;
    use labkit_core::paste::CreatePaste;

    use super::*;

    fn text(s: &str) -> CreatePaste {
        CreatePaste {
            text: Some(s.into()),
            content_type: None,
        }
    }

    #[tokio::test]
    async fn sweeps_expired_pastes_and_stops_on_cancel() {
        let store = Arc::new(MemoryPasteStore::default());
        let pastes = PasteManager::new(store.clone());

        pastes
            .create_at(text("old"), Utc::now() - ChronoDuration::hours(30))
            .await
            .unwrap();
        let live = pastes.create(text("new")).await.unwrap();

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            pastes.clone(),
            Duration::from_secs(3600),
            cancel.clone(),
        ));

        // The first tick fires immediately.
        let mut remaining = 2;
        for _ in 0..100 {
            remaining = pastes.count().await.unwrap();
            if remaining == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(remaining, 1);
        assert_eq!(pastes.get(&live.id).await.unwrap().content, "new");

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweep job should stop after cancel")
            .unwrap();
    }
}
