mod memory;
mod postgres;
mod types;

pub use memory::MemoryStore;
pub use postgres::Database;
pub use types::{EventRecord, StoreError};

use async_trait::async_trait;

/// Durable keyed table of reconciled calendar events.
///
/// Each operation is a single independent read or write; no transactional
/// multi-row operation exists. Implementations must be safe for concurrent
/// use by the scheduler task and all request-handling tasks. There is no
/// delete: events that disappear from the remote feed stay in the store.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Point lookup by the matching key.
    async fn find_by_uid(&self, uid: &str) -> Result<Option<EventRecord>, StoreError>;

    /// Unconditional insert of a new row (single-writer assumption; the
    /// caller has already established that `record.uid` is absent).
    async fn insert(&self, record: &EventRecord) -> Result<(), StoreError>;

    /// Full overwrite of the mutable fields of the row keyed by `uid`.
    async fn update(&self, uid: &str, record: &EventRecord) -> Result<(), StoreError>;

    /// Full scan, used to regenerate the served feed document.
    async fn scan_all(&self) -> Result<Vec<EventRecord>, StoreError>;
}
