//! Adgen API Client

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use adgen::domain::{JobStatusReport, PipelineError, Purpose, TrackedItem};
use adgen::ports::StatusSource;

/// API Client for the Adgen server.
///
/// Also implements the poller's StatusSource port, so `watch` drives
/// the same polling state machine the server-side tests exercise.
pub struct AdgenClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
pub struct JobItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub purpose: Purpose,
    pub sector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateJobRequest<'a> {
    items: &'a [JobItem],
    skip_cache: bool,
}

#[derive(Debug, Deserialize)]
struct CreateJobResponse {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct JobItemsResponse {
    items: Vec<TrackedItem>,
}

impl AdgenClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Trigger a generation job
    pub async fn create_job(&self, items: &[JobItem], skip_cache: bool) -> Result<String> {
        let url = format!("{}/adgen/jobs", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&CreateJobRequest { items, skip_cache })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Failed to create job ({}): {}", status, body);
        }

        let created: CreateJobResponse = resp.json().await?;
        Ok(created.job_id)
    }
}

#[async_trait]
impl StatusSource for AdgenClient {
    async fn fetch_status(&self, job_id: &str) -> Result<JobStatusReport, PipelineError> {
        let url = format!("{}/adgen/jobs/{}/status", self.base_url, job_id);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PipelineError::Transient(format!(
                "status endpoint returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| PipelineError::Transient(e.to_string()))
    }

    async fn fetch_items(&self, job_id: &str) -> Result<Vec<TrackedItem>, PipelineError> {
        let url = format!("{}/adgen/jobs/{}/items", self.base_url, job_id);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::Transient(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PipelineError::Transient(format!(
                "items endpoint returned {}",
                resp.status()
            )));
        }

        let listing: JobItemsResponse = resp
            .json()
            .await
            .map_err(|e| PipelineError::Transient(e.to_string()))?;
        Ok(listing.items)
    }
}
