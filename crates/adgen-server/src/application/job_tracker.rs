//! In-memory job registry behind the status and items routes.
//!
//! One record per running job. The status route reports the
//! fast-path contract from here; the items route serves the raw
//! listing the poller's fallback path derives progress from.

use std::collections::HashMap;

use tokio::sync::RwLock;

use adgen::domain::{JobState, JobStatusReport, PipelineStep, TrackedItem};

struct JobRecord {
    status: JobState,
    items: Vec<TrackedItem>,
    error: Option<String>,
}

impl JobRecord {
    fn report(&self) -> JobStatusReport {
        let completed = self
            .items
            .iter()
            .filter(|i| i.has_required_media())
            .count();
        let progress = if self.items.is_empty() {
            0.0
        } else {
            completed as f64 / self.items.len() as f64
        };
        JobStatusReport {
            status: self.status,
            progress,
            current_step: Some(PipelineStep::from_completion_ratio(progress)),
            completed_count: completed,
            error: self.error.clone(),
        }
    }
}

/// Registry of running and finished generation jobs
#[derive(Default)]
pub struct JobTracker {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job with its planned items, all still without media.
    pub async fn create(&self, job_id: &str, item_ids: &[String], requires_video: &[bool]) {
        let items = item_ids
            .iter()
            .zip(requires_video)
            .map(|(id, requires_video)| TrackedItem {
                id: id.clone(),
                image_url: None,
                video_url: None,
                gallery_urls: Vec::new(),
                requires_video: *requires_video,
            })
            .collect();
        self.jobs.write().await.insert(
            job_id.to_string(),
            JobRecord {
                status: JobState::Generating,
                items,
                error: None,
            },
        );
    }

    /// Attach a generated image to one item.
    pub async fn set_item_image(&self, job_id: &str, item_id: &str, url: String) {
        let mut jobs = self.jobs.write().await;
        if let Some(record) = jobs.get_mut(job_id) {
            if let Some(item) = record.items.iter_mut().find(|i| i.id == item_id) {
                item.image_url = Some(url);
            }
        }
    }

    pub async fn mark_completed(&self, job_id: &str) {
        let mut jobs = self.jobs.write().await;
        if let Some(record) = jobs.get_mut(job_id) {
            record.status = JobState::Completed;
        }
    }

    pub async fn mark_error(&self, job_id: &str, error: String) {
        let mut jobs = self.jobs.write().await;
        if let Some(record) = jobs.get_mut(job_id) {
            record.status = JobState::Error;
            record.error = Some(error);
        }
    }

    pub async fn status(&self, job_id: &str) -> Option<JobStatusReport> {
        self.jobs.read().await.get(job_id).map(|r| r.report())
    }

    pub async fn items(&self, job_id: &str) -> Option<Vec<TrackedItem>> {
        self.jobs.read().await.get(job_id).map(|r| r.items.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_progress_follows_item_media() {
        let tracker = JobTracker::new();
        tracker
            .create("j1", &["a".to_string(), "b".to_string()], &[false, false])
            .await;

        let report = tracker.status("j1").await.unwrap();
        assert_eq!(report.status, JobState::Generating);
        assert_eq!(report.completed_count, 0);

        tracker
            .set_item_image("j1", "a", "https://cdn.example/a.png".to_string())
            .await;
        let report = tracker.status("j1").await.unwrap();
        assert_eq!(report.completed_count, 1);
        assert!((report.progress - 0.5).abs() < f64::EPSILON);

        tracker
            .set_item_image("j1", "b", "https://cdn.example/b.png".to_string())
            .await;
        tracker.mark_completed("j1").await;
        let report = tracker.status("j1").await.unwrap();
        assert_eq!(report.status, JobState::Completed);
        assert!((report.progress - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_error_carries_message() {
        let tracker = JobTracker::new();
        tracker.create("j2", &["a".to_string()], &[false]).await;
        tracker.mark_error("j2", "quota exceeded".to_string()).await;

        let report = tracker.status("j2").await.unwrap();
        assert_eq!(report.status, JobState::Error);
        assert_eq!(report.error.as_deref(), Some("quota exceeded"));
    }

    #[tokio::test]
    async fn test_unknown_job_is_none() {
        let tracker = JobTracker::new();
        assert!(tracker.status("missing").await.is_none());
        assert!(tracker.items("missing").await.is_none());
    }
}
