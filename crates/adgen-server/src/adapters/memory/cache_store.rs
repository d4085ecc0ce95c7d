//! In-memory implementation of CacheStore.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use adgen::domain::{CacheEntry, Fingerprint, PipelineError};
use adgen::ports::CacheStore;

/// In-memory validated-artifact cache store
#[derive(Default)]
pub struct MemCacheStore {
    entries: RwLock<HashMap<Fingerprint, CacheEntry>>,
}

impl MemCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemCacheStore {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<CacheEntry>, PipelineError> {
        Ok(self.entries.read().await.get(fingerprint).cloned())
    }

    async fn put(&self, entry: &CacheEntry) -> Result<(), PipelineError> {
        self.entries
            .write()
            .await
            .insert(entry.fingerprint.clone(), entry.clone());
        Ok(())
    }

    async fn remove(&self, fingerprint: &Fingerprint) -> Result<(), PipelineError> {
        self.entries.write().await.remove(fingerprint);
        Ok(())
    }
}
