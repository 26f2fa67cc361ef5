//! Perpetual fixed-interval polling task.
//!
//! At most one cycle runs at a time: the loop awaits each cycle to
//! completion before the next tick. With `MissedTickBehavior::Delay` a tick
//! that fires while a cycle is still running is absorbed rather than queued,
//! so the real polling period silently stretches under load. Cycle errors
//! are logged and the loop keeps going; the next tick is the retry.

use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::feed::fetcher;
use crate::store::EventStore;
use crate::sync::reconcile::{self, ReconcileStats, SyncError};

pub async fn run<S: EventStore>(
    store: S,
    client: reqwest::Client,
    feed_url: String,
    interval: Duration,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick fires immediately, so the mirror populates on startup.
        ticker.tick().await;

        match run_cycle(&store, &client, &feed_url).await {
            Ok(stats) => {
                tracing::info!(
                    inserted = stats.inserted,
                    updated = stats.updated,
                    unchanged = stats.unchanged,
                    "Reconciliation cycle complete"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, url = %feed_url, "Reconciliation cycle failed");
            }
        }
    }
}

/// One full fetch → parse → reconcile pass.
pub async fn run_cycle<S: EventStore>(
    store: &S,
    client: &reqwest::Client,
    feed_url: &str,
) -> Result<ReconcileStats, SyncError> {
    let outcome = fetcher::fetch_feed(client, feed_url).await?;

    if outcome.skipped > 0 {
        tracing::warn!(
            skipped = outcome.skipped,
            "Dropped entries missing required fields"
        );
    }

    reconcile::reconcile(store, &outcome.entries).await
}
