//! Progress Poller - resilient client-side job tracking.
//!
//! Polls the fast status endpoint on a short interval; after the retry
//! budget is spent it degrades to the slower raw-listing fallback
//! instead of surfacing an error. Only the fallback path can fail the
//! poll. Requests never overlap because each tick awaits its request
//! before sleeping, and a hard timeout bounds the whole poll.
//!
//! Progress updates are emitted only on observable change. Change is
//! value-based: a tick counts as changed when the progress ratio, the
//! job state, the item count or the set of media references actually
//! differs, so re-ordered listings do not produce spurious updates.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{JobState, PipelineStep, TrackedItem};
use crate::ports::StatusSource;

/// Timing and budget knobs for one poll
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Tick interval on the fast status path
    pub fast_interval: Duration,
    /// Tick interval on the fallback listing path
    pub fallback_interval: Duration,
    /// Consecutive failures tolerated per path before degrading
    pub max_retries: u32,
    /// Hard bound on the whole poll
    pub timeout: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            fast_interval: Duration::from_secs(2),
            fallback_interval: Duration::from_secs(10),
            max_retries: 3,
            timeout: Duration::from_secs(300),
        }
    }
}

/// Which path the poller is currently on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Fast,
    Fallback,
}

/// Snapshot emitted to the observer when something changed
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub progress: f64,
    pub step: PipelineStep,
    pub completed_count: usize,
    pub phase: PollPhase,
}

/// How a poll ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Completed { items: Vec<TrackedItem> },
    Failed { error: String },
    TimedOut,
    Cancelled,
}

/// Cooperative cancellation for an in-flight poll
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Client-side polling state machine over a status source
pub struct ProgressPoller {
    source: Arc<dyn StatusSource>,
    config: PollerConfig,
}

impl ProgressPoller {
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        Self::with_config(source, PollerConfig::default())
    }

    pub fn with_config(source: Arc<dyn StatusSource>, config: PollerConfig) -> Self {
        Self { source, config }
    }

    /// Poll until the job terminates, the timeout elapses or the
    /// handle is cancelled. `on_update` fires on every observable
    /// change.
    pub async fn poll(
        &self,
        job_id: &str,
        cancel: &CancelHandle,
        mut on_update: impl FnMut(ProgressUpdate),
    ) -> PollOutcome {
        let deadline = tokio::time::Instant::now() + self.config.timeout;
        let mut phase = PollPhase::Fast;
        let mut retries = 0u32;
        let mut last_progress = f64::NAN;
        let mut last_state: Option<JobState> = None;
        let mut last_count = 0usize;
        let mut last_refs: BTreeSet<String> = BTreeSet::new();

        loop {
            if cancel.is_cancelled() {
                tracing::info!("Poll for job {} cancelled", job_id);
                return PollOutcome::Cancelled;
            }
            if tokio::time::Instant::now() >= deadline {
                tracing::warn!("Poll for job {} timed out", job_id);
                return PollOutcome::TimedOut;
            }

            match phase {
                PollPhase::Fast => match self.source.fetch_status(job_id).await {
                    Ok(report) => {
                        retries = 0;
                        let changed = last_progress.is_nan()
                            || (report.progress - last_progress).abs() > f64::EPSILON
                            || last_state != Some(report.status);
                        last_progress = report.progress;
                        last_state = Some(report.status);

                        if changed {
                            on_update(ProgressUpdate {
                                progress: report.progress,
                                step: report
                                    .current_step
                                    .unwrap_or_else(|| {
                                        PipelineStep::from_completion_ratio(report.progress)
                                    }),
                                completed_count: report.completed_count,
                                phase,
                            });
                        }

                        match report.status {
                            JobState::Completed => {
                                let items = self.final_items(job_id).await;
                                return PollOutcome::Completed { items };
                            }
                            JobState::Error => {
                                return PollOutcome::Failed {
                                    error: report
                                        .error
                                        .unwrap_or_else(|| "generation failed".to_string()),
                                }
                            }
                            _ => {}
                        }

                        tokio::time::sleep(self.config.fast_interval).await;
                    }
                    Err(e) => {
                        retries += 1;
                        if retries > self.config.max_retries {
                            tracing::warn!(
                                "Status endpoint unavailable for job {}, degrading to listing: {}",
                                job_id,
                                e
                            );
                            phase = PollPhase::Fallback;
                            retries = 0;
                        } else {
                            tokio::time::sleep(backoff(retries)).await;
                        }
                    }
                },
                PollPhase::Fallback => match self.source.fetch_items(job_id).await {
                    Ok(items) => {
                        retries = 0;
                        let completed =
                            items.iter().filter(|i| i.has_required_media()).count();
                        let progress = if items.is_empty() {
                            0.0
                        } else {
                            completed as f64 / items.len() as f64
                        };

                        let refs: BTreeSet<String> = items
                            .iter()
                            .flat_map(|i| i.media_refs())
                            .map(str::to_string)
                            .collect();
                        let changed = last_progress.is_nan()
                            || items.len() > last_count
                            || (progress - last_progress).abs() > f64::EPSILON
                            || refs != last_refs;
                        last_progress = progress;
                        last_count = items.len();
                        last_refs = refs;

                        if changed {
                            on_update(ProgressUpdate {
                                progress,
                                step: PipelineStep::from_completion_ratio(progress),
                                completed_count: completed,
                                phase,
                            });
                        }

                        if !items.is_empty() && completed == items.len() {
                            return PollOutcome::Completed { items };
                        }

                        tokio::time::sleep(self.config.fallback_interval).await;
                    }
                    Err(e) => {
                        retries += 1;
                        if retries > self.config.max_retries {
                            tracing::error!("Fallback listing exhausted for job {}: {}", job_id, e);
                            return PollOutcome::Failed {
                                error: e.to_string(),
                            };
                        }
                        tokio::time::sleep(backoff(retries)).await;
                    }
                },
            }
        }
    }

    /// Final listing after a reported completion. Best-effort; the
    /// completion itself is authoritative.
    async fn final_items(&self, job_id: &str) -> Vec<TrackedItem> {
        match self.source.fetch_items(job_id).await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Failed to list items for completed job {}: {}", job_id, e);
                Vec::new()
            }
        }
    }
}

/// Exponential backoff between failed requests: 2, 4, 8 seconds.
fn backoff(retry: u32) -> Duration {
    Duration::from_secs(2u64.pow(retry.min(3)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobStatusReport, PipelineError};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;

    /// Source scripted with a sequence of status responses; the last
    /// entry repeats forever. Item listings are fixed.
    struct ScriptedSource {
        statuses: Vec<Result<JobStatusReport, PipelineError>>,
        items: Vec<Result<Vec<TrackedItem>, PipelineError>>,
        status_calls: AtomicU32,
        item_calls: AtomicU32,
    }

    impl ScriptedSource {
        fn status(progress: f64, status: JobState) -> Result<JobStatusReport, PipelineError> {
            Ok(JobStatusReport {
                status,
                progress,
                current_step: None,
                completed_count: 0,
                error: None,
            })
        }

        fn fail() -> Result<JobStatusReport, PipelineError> {
            Err(PipelineError::Transient("status endpoint down".to_string()))
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch_status(&self, _job_id: &str) -> Result<JobStatusReport, PipelineError> {
            let n = self.status_calls.fetch_add(1, Ordering::SeqCst) as usize;
            let idx = n.min(self.statuses.len() - 1);
            clone_status(&self.statuses[idx])
        }

        async fn fetch_items(&self, _job_id: &str) -> Result<Vec<TrackedItem>, PipelineError> {
            let n = self.item_calls.fetch_add(1, Ordering::SeqCst) as usize;
            let idx = n.min(self.items.len() - 1);
            clone_items(&self.items[idx])
        }
    }

    fn clone_status(
        r: &Result<JobStatusReport, PipelineError>,
    ) -> Result<JobStatusReport, PipelineError> {
        match r {
            Ok(s) => Ok(s.clone()),
            Err(e) => Err(PipelineError::Transient(e.to_string())),
        }
    }

    fn clone_items(
        r: &Result<Vec<TrackedItem>, PipelineError>,
    ) -> Result<Vec<TrackedItem>, PipelineError> {
        match r {
            Ok(items) => Ok(items.clone()),
            Err(e) => Err(PipelineError::Transient(e.to_string())),
        }
    }

    fn item(id: &str, image: Option<&str>) -> TrackedItem {
        TrackedItem {
            id: id.to_string(),
            image_url: image.map(str::to_string),
            video_url: None,
            gallery_urls: vec![],
            requires_video: false,
        }
    }

    fn fast_config() -> PollerConfig {
        PollerConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn test_reports_progress_then_completes() {
        let source = Arc::new(ScriptedSource {
            statuses: vec![
                ScriptedSource::status(0.1, JobState::Generating),
                ScriptedSource::status(0.5, JobState::Generating),
                ScriptedSource::status(1.0, JobState::Completed),
            ],
            items: vec![Ok(vec![item("p1", Some("https://cdn.example/a.png"))])],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source, fast_config());

        let updates = Mutex::new(Vec::new());
        let outcome = poller
            .poll("job-1", &CancelHandle::new(), |u| {
                updates.lock().unwrap().push(u)
            })
            .await;

        match outcome {
            PollOutcome::Completed { items } => assert_eq!(items.len(), 1),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let updates = updates.into_inner().unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].step, PipelineStep::Initialization);
        assert_eq!(updates[1].step, PipelineStep::PrimaryMedia);
        assert_eq!(updates[2].step, PipelineStep::Finalization);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_ticks_emit_nothing() {
        let source = Arc::new(ScriptedSource {
            statuses: vec![
                ScriptedSource::status(0.5, JobState::Generating),
                ScriptedSource::status(0.5, JobState::Generating),
                ScriptedSource::status(0.5, JobState::Generating),
                ScriptedSource::status(1.0, JobState::Completed),
            ],
            items: vec![Ok(vec![])],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source, fast_config());

        let count = AtomicU32::new(0);
        poller
            .poll("job-2", &CancelHandle::new(), |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        // First observation plus the jump to completed
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_degrades_to_fallback_and_completes() {
        let source = Arc::new(ScriptedSource {
            statuses: vec![ScriptedSource::fail()],
            items: vec![
                Ok(vec![item("p1", Some("https://cdn.example/a.png")), item("p2", None)]),
                Ok(vec![
                    item("p1", Some("https://cdn.example/a.png")),
                    item("p2", Some("https://cdn.example/b.png")),
                ]),
            ],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source.clone(), fast_config());

        let phases = Mutex::new(Vec::new());
        let outcome = poller
            .poll("job-3", &CancelHandle::new(), |u| {
                phases.lock().unwrap().push(u.phase)
            })
            .await;

        match outcome {
            PollOutcome::Completed { items } => assert_eq!(items.len(), 2),
            other => panic!("unexpected outcome: {:?}", other),
        }
        // Retries were spent on the fast path before degrading
        assert_eq!(source.status_calls.load(Ordering::SeqCst), 4);
        assert!(phases
            .into_inner()
            .unwrap()
            .iter()
            .all(|p| *p == PollPhase::Fallback));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reordered_listing_is_not_a_change() {
        let a = item("p1", Some("https://cdn.example/a.png"));
        let b = item("p2", None);
        let b_done = item("p2", Some("https://cdn.example/b.png"));
        let source = Arc::new(ScriptedSource {
            statuses: vec![ScriptedSource::fail()],
            items: vec![
                Ok(vec![a.clone(), b.clone()]),
                // Same media, different order: must not re-trigger
                Ok(vec![b, a.clone()]),
                Ok(vec![a, b_done]),
            ],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source, fast_config());

        let count = AtomicU32::new(0);
        let outcome = poller
            .poll("job-8", &CancelHandle::new(), |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        assert!(matches!(outcome, PollOutcome::Completed { .. }));
        // First snapshot and the finishing one; the reorder in between
        // emitted nothing
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_count_growth_is_a_change() {
        let source = Arc::new(ScriptedSource {
            statuses: vec![ScriptedSource::fail()],
            items: vec![
                Ok(vec![item("p1", None), item("p2", None)]),
                // A third item appears with no media yet: progress and
                // refs are unchanged, the count alone must re-trigger
                Ok(vec![item("p1", None), item("p2", None), item("p3", None)]),
                Ok(vec![
                    item("p1", Some("https://cdn.example/a.png")),
                    item("p2", Some("https://cdn.example/b.png")),
                    item("p3", Some("https://cdn.example/c.png")),
                ]),
            ],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source, fast_config());

        let count = AtomicU32::new(0);
        let outcome = poller
            .poll("job-9", &CancelHandle::new(), |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        match outcome {
            PollOutcome::Completed { items } => assert_eq!(items.len(), 3),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_exhaustion_fails() {
        let source = Arc::new(ScriptedSource {
            statuses: vec![ScriptedSource::fail()],
            items: vec![Err(PipelineError::Transient("listing down".to_string()))],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source, fast_config());

        let outcome = poller.poll("job-4", &CancelHandle::new(), |_| {}).await;
        assert!(matches!(outcome, PollOutcome::Failed { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_on_stalled_job() {
        let source = Arc::new(ScriptedSource {
            statuses: vec![ScriptedSource::status(0.1, JobState::Generating)],
            items: vec![Ok(vec![])],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source, fast_config());

        let outcome = poller.poll("job-5", &CancelHandle::new(), |_| {}).await;
        assert_eq!(outcome, PollOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let source = Arc::new(ScriptedSource {
            statuses: vec![ScriptedSource::status(0.1, JobState::Generating)],
            items: vec![Ok(vec![])],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source, fast_config());

        let cancel = CancelHandle::new();
        cancel.cancel();
        let outcome = poller.poll("job-6", &cancel, |_| {}).await;
        assert_eq!(outcome, PollOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_state_fails_with_message() {
        let source = Arc::new(ScriptedSource {
            statuses: vec![Ok(JobStatusReport {
                status: JobState::Error,
                progress: 0.4,
                current_step: None,
                completed_count: 0,
                error: Some("provider quota exceeded".to_string()),
            })],
            items: vec![Ok(vec![])],
            status_calls: AtomicU32::new(0),
            item_calls: AtomicU32::new(0),
        });
        let poller = ProgressPoller::with_config(source, fast_config());

        let outcome = poller.poll("job-7", &CancelHandle::new(), |_| {}).await;
        assert_eq!(
            outcome,
            PollOutcome::Failed {
                error: "provider quota exceeded".to_string()
            }
        );
    }
}
