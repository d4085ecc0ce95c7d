//! Status Source Port
//!
//! The progress poller's view of a running job: a fast dedicated
//! status endpoint and a fallback raw item listing from which progress
//! can be derived when the status endpoint is unavailable.

use async_trait::async_trait;

use crate::domain::{JobStatusReport, PipelineError, TrackedItem};

/// Job status provider consumed by the progress poller
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fast path: dedicated status endpoint
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatusReport, PipelineError>;

    /// Fallback path: raw listing of tracked items
    async fn fetch_items(&self, job_id: &str) -> Result<Vec<TrackedItem>, PipelineError>;
}
