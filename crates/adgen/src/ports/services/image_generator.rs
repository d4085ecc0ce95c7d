//! Image Generation Port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ArtifactRef, PipelineError};

/// Request contract for the image collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub aspect_ratio: String,
    /// Base64 product reference image, when fidelity to a real product
    /// is required
    pub reference_image: Option<String>,
}

/// Response contract for the image collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResponse {
    pub artifact_url: ArtifactRef,
}

/// Image generation collaborator interface.
///
/// Calls block their orchestrator attempt until response or error; no
/// cancellation token is propagated into the collaborator.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, request: &ImageRequest) -> Result<ImageResponse, PipelineError>;
}
