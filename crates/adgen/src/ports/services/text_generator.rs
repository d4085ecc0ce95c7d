//! Text Generation Port
//!
//! Abstract interface for the external text-generation collaborator.
//! Implementations can be swapped between providers without touching
//! the pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::PipelineError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    System,
    User,
    Assistant,
}

impl TextRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextRole::System => "system",
            TextRole::User => "user",
            TextRole::Assistant => "assistant",
        }
    }
}

/// A message in a text-generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextMessage {
    pub role: TextRole,
    pub content: String,
}

impl TextMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: TextRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TextRole::User,
            content: content.into(),
        }
    }
}

/// Request contract for the text collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub messages: Vec<TextMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

/// Response contract for the text collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    pub content: String,
    pub token_count: u32,
}

/// Text generation collaborator interface
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, request: &TextRequest) -> Result<TextResponse, PipelineError>;
}
