//! Request / response models for the adgen API.

use serde::{Deserialize, Serialize};

use adgen::{GenerationContext, JobStatusReport, Purpose, TrackedItem};

/// One requested creative in a job
#[derive(Debug, Clone, Deserialize)]
pub struct JobItemRequest {
    /// Caller-supplied item id, defaulted when absent
    pub id: Option<String>,
    /// Scene description; falls back to the registry template
    pub prompt: Option<String>,
    pub purpose: Purpose,
    pub sector: String,
    pub style: Option<String>,
    pub positioning: Option<String>,
    pub time_of_day: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub requires_video: bool,
}

impl JobItemRequest {
    pub fn context(&self) -> GenerationContext {
        GenerationContext {
            purpose: self.purpose,
            sector: self.sector.clone(),
            style: self.style.clone(),
            positioning: self.positioning.clone(),
            time_of_day: self.time_of_day.clone(),
            brand: self.brand.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub items: Vec<JobItemRequest>,
    #[serde(default)]
    pub skip_cache: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: String,
}

/// Body of GET /adgen/jobs/:id/status
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    #[serde(flatten)]
    pub report: JobStatusReport,
}

/// Body of GET /adgen/jobs/:id/items
#[derive(Debug, Serialize)]
pub struct JobItemsResponse {
    pub items: Vec<TrackedItem>,
}
