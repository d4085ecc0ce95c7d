//! HTTP implementation of the TextGenerator port.
//!
//! Speaks a chat-completions style wire contract. Timeouts and 5xx /
//! 429 responses map to the transient error class so the pipeline can
//! retry them; everything else is a hard external-service error.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use adgen::domain::PipelineError;
use adgen::ports::{TextGenerator, TextRequest, TextResponse};

/// Text collaborator over HTTP
pub struct HttpTextGenerator {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpTextGenerator {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Deserialize)]
struct WireChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct WireUsage {
    total_tokens: u32,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    usage: Option<WireUsage>,
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate_text(&self, request: &TextRequest) -> Result<TextResponse, PipelineError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let wire = WireRequest {
            messages: request
                .messages
                .iter()
                .map(|m| WireMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            frequency_penalty: request.frequency_penalty,
            presence_penalty: request.presence_penalty,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&wire)
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
            let message = format!("text collaborator {}: {}", status, body);
            return if status.is_server_error() || status.as_u16() == 429 {
                Err(PipelineError::Transient(message))
            } else {
                Err(PipelineError::ExternalService(message))
            };
        }

        let result: WireResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::ExternalService(e.to_string()))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                PipelineError::ExternalService("text collaborator returned no choices".to_string())
            })?;

        Ok(TextResponse {
            content,
            token_count: result.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }
}
