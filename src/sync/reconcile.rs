//! Turns a freshly fetched batch of remote entries into the minimal set of
//! writes against the store.
//!
//! Matching key is the entry UID. For each entry: absent uid means insert,
//! present-but-different means one full update, identical means no write at
//! all. The compare-then-write step is what keeps an unchanged remote feed
//! from producing a write storm every polling interval.
//!
//! The engine holds no state across cycles; every cycle is derived from the
//! fetched entries and fresh point lookups.

use chrono::NaiveDate;
use thiserror::Error;

use crate::feed::fetcher::FetchError;
use crate::feed::parser::{ParsedEntry, FEED_DATE_FORMAT};
use crate::store::{EventRecord, EventStore, StoreError};

/// Everything that can abort one reconciliation cycle. The scheduler logs
/// these and waits for the next tick; none of them are fatal.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("entry {uid}: invalid feed date {value:?}: {source}")]
    InvalidDate {
        uid: String,
        value: String,
        source: chrono::ParseError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-cycle write counts, for observability only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileStats {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

/// Reconcile one batch of entries, in feed order.
///
/// A bad date on any entry aborts the whole cycle (fail-fast, not skip-one).
/// There is no transaction across entries: a failure partway through leaves
/// earlier writes durable.
pub async fn reconcile<S: EventStore>(
    store: &S,
    entries: &[ParsedEntry],
) -> Result<ReconcileStats, SyncError> {
    let mut stats = ReconcileStats::default();

    for entry in entries {
        let incoming = EventRecord {
            uid: entry.uid.clone(),
            summary: entry.summary.clone(),
            start: parse_feed_date(&entry.uid, &entry.dtstart)?,
            end: parse_feed_date(&entry.uid, &entry.dtend)?,
        };

        match store.find_by_uid(&incoming.uid).await? {
            None => {
                store.insert(&incoming).await?;
                stats.inserted += 1;
            }
            Some(existing) => {
                if existing.start != incoming.start
                    || existing.end != incoming.end
                    || existing.summary != incoming.summary
                {
                    store.update(&incoming.uid, &incoming).await?;
                    stats.updated += 1;
                } else {
                    stats.unchanged += 1;
                }
            }
        }
    }

    Ok(stats)
}

fn parse_feed_date(uid: &str, value: &str) -> Result<NaiveDate, SyncError> {
    NaiveDate::parse_from_str(value, FEED_DATE_FORMAT).map_err(|source| SyncError::InvalidDate {
        uid: uid.to_string(),
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn entry(uid: &str, summary: &str, dtstart: &str, dtend: &str) -> ParsedEntry {
        ParsedEntry {
            uid: uid.to_string(),
            summary: summary.to_string(),
            dtstart: dtstart.to_string(),
            dtend: dtend.to_string(),
        }
    }

    #[tokio::test]
    async fn test_new_entry_inserts_all_fields() {
        let store = MemoryStore::new();
        let stats = reconcile(&store, &[entry("u1", "Reserved", "20240101", "20240103")])
            .await
            .unwrap();

        assert_eq!(
            stats,
            ReconcileStats {
                inserted: 1,
                updated: 0,
                unchanged: 0
            }
        );

        let stored = store.find_by_uid("u1").await.unwrap().unwrap();
        assert_eq!(stored.summary, "Reserved");
        assert_eq!(stored.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(stored.end, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[tokio::test]
    async fn test_identical_entry_issues_no_write() {
        let store = MemoryStore::new();
        let batch = [entry("u1", "Reserved", "20240101", "20240103")];

        reconcile(&store, &batch).await.unwrap();
        let writes_after_first = store.writes().await;

        let stats = reconcile(&store, &batch).await.unwrap();
        assert_eq!(
            stats,
            ReconcileStats {
                inserted: 0,
                updated: 0,
                unchanged: 1
            }
        );
        assert_eq!(store.writes().await, writes_after_first);
    }

    #[tokio::test]
    async fn test_changed_summary_triggers_exactly_one_update() {
        let store = MemoryStore::new();
        reconcile(&store, &[entry("u1", "A", "20240101", "20240103")])
            .await
            .unwrap();

        let stats = reconcile(&store, &[entry("u1", "B", "20240101", "20240103")])
            .await
            .unwrap();

        assert_eq!(
            stats,
            ReconcileStats {
                inserted: 0,
                updated: 1,
                unchanged: 0
            }
        );
        let stored = store.find_by_uid("u1").await.unwrap().unwrap();
        assert_eq!(stored.summary, "B");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_changed_dates_trigger_update_for_same_uid() {
        let store = MemoryStore::new();
        reconcile(&store, &[entry("u1", "Reserved", "20240101", "20240103")])
            .await
            .unwrap();

        let stats = reconcile(&store, &[entry("u1", "Reserved", "20240105", "20240107")])
            .await
            .unwrap();

        assert_eq!(stats.updated, 1);
        let stored = store.find_by_uid("u1").await.unwrap().unwrap();
        assert_eq!(stored.start, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(stored.end, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
    }

    #[tokio::test]
    async fn test_mixed_batch_counts_each_decision() {
        let store = MemoryStore::new();
        reconcile(
            &store,
            &[
                entry("u1", "A", "20240101", "20240103"),
                entry("u2", "B", "20240110", "20240112"),
            ],
        )
        .await
        .unwrap();

        let stats = reconcile(
            &store,
            &[
                entry("u1", "A", "20240101", "20240103"),
                entry("u2", "B2", "20240110", "20240112"),
                entry("u3", "C", "20240120", "20240122"),
            ],
        )
        .await
        .unwrap();

        assert_eq!(
            stats,
            ReconcileStats {
                inserted: 1,
                updated: 1,
                unchanged: 1
            }
        );
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_bad_date_aborts_cycle_but_keeps_earlier_writes() {
        let store = MemoryStore::new();
        let err = reconcile(
            &store,
            &[
                entry("u1", "A", "20240101", "20240103"),
                entry("u2", "B", "2024-01-10", "20240112"),
                entry("u3", "C", "20240120", "20240122"),
            ],
        )
        .await
        .unwrap_err();

        match err {
            SyncError::InvalidDate { uid, value, .. } => {
                assert_eq!(uid, "u2");
                assert_eq!(value, "2024-01-10");
            }
            e => panic!("Expected InvalidDate, got {:?}", e),
        }

        // First entry was written before the abort; the rest never were.
        assert!(store.find_by_uid("u1").await.unwrap().is_some());
        assert!(store.find_by_uid("u2").await.unwrap().is_none());
        assert!(store.find_by_uid("u3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_disappeared_entries_are_never_deleted() {
        let store = MemoryStore::new();
        reconcile(
            &store,
            &[
                entry("u1", "A", "20240101", "20240103"),
                entry("u2", "B", "20240110", "20240112"),
            ],
        )
        .await
        .unwrap();

        // u1 vanished from the remote feed; it must survive in the store.
        reconcile(&store, &[entry("u2", "B", "20240110", "20240112")])
            .await
            .unwrap();

        assert!(store.find_by_uid("u1").await.unwrap().is_some());
        assert_eq!(store.len().await, 2);
    }
}
