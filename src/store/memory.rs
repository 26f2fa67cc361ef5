//! Map-backed [`EventStore`] used by the test suite and as a database-free
//! demo backend. Tracks how many writes were issued so tests can assert
//! that unchanged entries produce none.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::store::{EventRecord, EventStore, StoreError};

#[derive(Default)]
struct Inner {
    events: BTreeMap<String, EventRecord>,
    writes: usize,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of insert/update calls issued so far.
    pub async fn writes(&self) -> usize {
        self.inner.lock().await.writes
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.events.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.events.is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn find_by_uid(&self, uid: &str) -> Result<Option<EventRecord>, StoreError> {
        Ok(self.inner.lock().await.events.get(uid).cloned())
    }

    async fn insert(&self, record: &EventRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.writes += 1;
        inner.events.insert(record.uid.clone(), record.clone());
        Ok(())
    }

    async fn update(&self, uid: &str, record: &EventRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        inner.writes += 1;
        if let Some(existing) = inner.events.get_mut(uid) {
            *existing = record.clone();
        }
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<EventRecord>, StoreError> {
        Ok(self.inner.lock().await.events.values().cloned().collect())
    }
}
