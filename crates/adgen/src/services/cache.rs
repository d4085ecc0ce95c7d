//! Artifact Cache - fingerprint-keyed reuse of accepted artifacts.
//!
//! Only artifacts the orchestrator accepted are ever stored, so a
//! cache hit is always of known-good quality. Expiry is lazy: an entry
//! past its TTL is evicted at lookup time, there is no sweeper task.
//!
//! All cache traffic is best-effort. A store failure turns a lookup
//! into a miss and a write into a log line; cache trouble never fails
//! a generation.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::{ArtifactRef, CacheEntry, Fingerprint, PipelineError, ValidationResult};
use crate::ports::CacheStore;

/// Default entry lifetime, 30 days
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Reuse layer over the cache store
pub struct ArtifactCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl ArtifactCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_ttl(store, DEFAULT_TTL)
    }

    pub fn with_ttl(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Look up a fresh entry. Expired entries are evicted and report
    /// as a miss; store failures also report as a miss.
    pub async fn lookup(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let entry = match self.store.get(fingerprint).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Cache lookup failed for {}: {}", fingerprint, e);
                return None;
            }
        };

        if entry.age_secs(Utc::now()) > self.ttl.as_secs() as i64 {
            tracing::debug!("Evicting expired cache entry {}", fingerprint);
            if let Err(e) = self.store.remove(fingerprint).await {
                tracing::warn!("Failed to evict {}: {}", fingerprint, e);
            }
            return None;
        }

        tracing::info!("Cache hit for {} (score {})", fingerprint, entry.score);
        Some(entry)
    }

    /// Store an accepted artifact. Best-effort; a write failure is
    /// logged and swallowed so acceptance is never rolled back.
    pub async fn store_accepted(
        &self,
        fingerprint: Fingerprint,
        context_fingerprint: Fingerprint,
        artifact: ArtifactRef,
        validation: &ValidationResult,
    ) {
        let entry = CacheEntry {
            fingerprint: fingerprint.clone(),
            artifact,
            score: validation.score,
            validation: validation.clone(),
            context_fingerprint: context_fingerprint.0,
            created_at: Utc::now(),
        };
        if let Err(e) = self.store.put(&entry).await {
            tracing::warn!("Failed to cache accepted artifact {}: {}", fingerprint, e);
        }
    }

    /// Explicit invalidation, used when a caller forces regeneration.
    pub async fn invalidate(&self, fingerprint: &Fingerprint) -> Result<(), PipelineError> {
        self.store.remove(fingerprint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    struct TestCacheStore {
        entries: RwLock<HashMap<Fingerprint, CacheEntry>>,
        fail: bool,
    }

    impl TestCacheStore {
        fn empty() -> Arc<Self> {
            Arc::new(Self {
                entries: RwLock::new(HashMap::new()),
                fail: false,
            })
        }
    }

    #[async_trait]
    impl CacheStore for TestCacheStore {
        async fn get(&self, fp: &Fingerprint) -> Result<Option<CacheEntry>, PipelineError> {
            if self.fail {
                return Err(PipelineError::Store("backend offline".to_string()));
            }
            Ok(self.entries.read().await.get(fp).cloned())
        }

        async fn put(&self, entry: &CacheEntry) -> Result<(), PipelineError> {
            if self.fail {
                return Err(PipelineError::Store("backend offline".to_string()));
            }
            self.entries
                .write()
                .await
                .insert(entry.fingerprint.clone(), entry.clone());
            Ok(())
        }

        async fn remove(&self, fp: &Fingerprint) -> Result<(), PipelineError> {
            self.entries.write().await.remove(fp);
            Ok(())
        }
    }

    fn fp(s: &str) -> Fingerprint {
        Fingerprint::new(s)
    }

    #[tokio::test]
    async fn test_store_then_lookup() {
        let store = TestCacheStore::empty();
        let cache = ArtifactCache::new(store);

        let validation = ValidationResult::passing(91);
        cache
            .store_accepted(
                fp("abc"),
                fp("ctx"),
                ArtifactRef::new("https://cdn.example/1.png"),
                &validation,
            )
            .await;

        let hit = cache.lookup(&fp("abc")).await.unwrap();
        assert_eq!(hit.score, 91);
        assert_eq!(hit.artifact.as_str(), "https://cdn.example/1.png");
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted() {
        let store = TestCacheStore::empty();
        let cache = ArtifactCache::new(store.clone());

        let stale = CacheEntry {
            fingerprint: fp("old"),
            artifact: ArtifactRef::new("https://cdn.example/old.png"),
            score: 90,
            validation: ValidationResult::passing(90),
            context_fingerprint: "ctx".to_string(),
            created_at: Utc::now() - ChronoDuration::days(31),
        };
        store.put(&stale).await.unwrap();

        assert!(cache.lookup(&fp("old")).await.is_none());
        // Lazy eviction removed the entry from the backend too
        assert!(store.get(&fp("old")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_failure_is_a_miss() {
        let store = Arc::new(TestCacheStore {
            entries: RwLock::new(HashMap::new()),
            fail: true,
        });
        let cache = ArtifactCache::new(store);
        assert!(cache.lookup(&fp("abc")).await.is_none());
    }
}
