//! Cache Store Port

use async_trait::async_trait;

use crate::domain::{CacheEntry, Fingerprint, PipelineError};

/// Repository interface for the validated-artifact cache
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<CacheEntry>, PipelineError>;

    async fn put(&self, entry: &CacheEntry) -> Result<(), PipelineError>;

    /// Drop an expired entry. Best-effort; a failed removal only means
    /// the entry will be reconsidered on the next lookup.
    async fn remove(&self, fingerprint: &Fingerprint) -> Result<(), PipelineError>;
}
