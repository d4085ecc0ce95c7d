//! Server configuration from environment variables.

use anyhow::{Context, Result};

/// Runtime configuration, resolved once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Base URL of the text collaborator API
    pub text_api_url: String,
    pub text_api_key: String,
    /// Base URL of the image collaborator API
    pub image_api_url: String,
    pub image_api_key: String,
}

impl ServerConfig {
    /// Load from the environment. Missing collaborator credentials are
    /// a startup failure, not a degraded mode.
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        Ok(Self {
            port,
            text_api_url: required("ADGEN_TEXT_API_URL")?,
            text_api_key: required("ADGEN_TEXT_API_KEY")?,
            image_api_url: required("ADGEN_IMAGE_API_URL")?,
            image_api_key: required("ADGEN_IMAGE_API_KEY")?,
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} must be set", name))
}
