//! HTTP implementation of the ImageGenerator port.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use adgen::domain::{ArtifactRef, PipelineError};
use adgen::ports::{ImageGenerator, ImageRequest, ImageResponse};

/// Image collaborator over HTTP
pub struct HttpImageGenerator {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpImageGenerator {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Deserialize)]
struct WireImageResponse {
    url: String,
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageResponse, PipelineError> {
        let url = format!("{}/v1/images/generate", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    PipelineError::Transient(e.to_string())
                } else {
                    PipelineError::ExternalService(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("image collaborator {}: {}", status, body);
            return if status.is_server_error() || status.as_u16() == 429 {
                Err(PipelineError::Transient(message))
            } else {
                Err(PipelineError::ExternalService(message))
            };
        }

        let result: WireImageResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::ExternalService(e.to_string()))?;

        Ok(ImageResponse {
            artifact_url: ArtifactRef::new(result.url),
        })
    }
}
