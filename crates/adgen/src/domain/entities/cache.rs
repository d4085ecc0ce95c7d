//! Cache - Content-addressable entries for accepted artifacts.
//!
//! Entries are created only when the orchestrator accepts a validated
//! artifact. They are read-only afterwards; expiry is handled lazily by
//! the cache service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ArtifactRef, Fingerprint};
use crate::domain::ValidationResult;

/// One validated-good artifact, keyed by fingerprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub artifact: ArtifactRef,
    pub score: u8,
    pub validation: ValidationResult,
    /// Fingerprint of the context subset, kept for audit
    pub context_fingerprint: String,
    pub created_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_seconds()
    }
}
