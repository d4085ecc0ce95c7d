//! Job status types consumed by the progress poller.

use serde::{Deserialize, Serialize};

/// Server-reported state of a long-running generation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Draft,
    Generating,
    Active,
    Completed,
    Error,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Error)
    }
}

/// Pipeline step a job is currently in.
///
/// When no dedicated status endpoint exists the poller estimates the
/// step from the completion ratio. A heuristic proxy, not authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    Initialization,
    TextGeneration,
    PrimaryMedia,
    SecondaryMedia,
    Finalization,
}

impl PipelineStep {
    /// Map a completion ratio (0.0 - 1.0) to a step via fixed breakpoints.
    pub fn from_completion_ratio(ratio: f64) -> Self {
        if ratio > 0.8 {
            PipelineStep::Finalization
        } else if ratio > 0.6 {
            PipelineStep::SecondaryMedia
        } else if ratio > 0.3 {
            PipelineStep::PrimaryMedia
        } else if ratio > 0.1 {
            PipelineStep::TextGeneration
        } else {
            PipelineStep::Initialization
        }
    }
}

/// Snapshot of the status endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: JobState,
    /// Completion ratio 0.0 - 1.0
    pub progress: f64,
    pub current_step: Option<PipelineStep>,
    pub completed_count: usize,
    pub error: Option<String>,
}

/// One tracked item in a generation job, as seen by the poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub id: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub gallery_urls: Vec<String>,
    /// Whether this item needs a video before it counts as complete
    #[serde(default)]
    pub requires_video: bool,
}

impl TrackedItem {
    /// An item is complete once its required media is populated.
    pub fn has_required_media(&self) -> bool {
        let image_ok = self.image_url.is_some() || !self.gallery_urls.is_empty();
        if self.requires_video {
            image_ok && self.video_url.is_some()
        } else {
            image_ok
        }
    }

    /// Set of media references, for order-insensitive change detection.
    pub fn media_refs(&self) -> std::collections::BTreeSet<&str> {
        self.image_url
            .iter()
            .chain(self.video_url.iter())
            .chain(self.gallery_urls.iter())
            .map(|s| s.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_breakpoints() {
        assert_eq!(
            PipelineStep::from_completion_ratio(0.05),
            PipelineStep::Initialization
        );
        assert_eq!(
            PipelineStep::from_completion_ratio(0.2),
            PipelineStep::TextGeneration
        );
        assert_eq!(
            PipelineStep::from_completion_ratio(0.5),
            PipelineStep::PrimaryMedia
        );
        assert_eq!(
            PipelineStep::from_completion_ratio(0.7),
            PipelineStep::SecondaryMedia
        );
        assert_eq!(
            PipelineStep::from_completion_ratio(0.9),
            PipelineStep::Finalization
        );
    }

    #[test]
    fn test_required_media() {
        let mut item = TrackedItem {
            id: "p1".to_string(),
            image_url: Some("https://cdn.example.com/a.png".to_string()),
            video_url: None,
            gallery_urls: vec![],
            requires_video: false,
        };
        assert!(item.has_required_media());

        item.requires_video = true;
        assert!(!item.has_required_media());

        item.video_url = Some("https://cdn.example.com/a.mp4".to_string());
        assert!(item.has_required_media());
    }
}
