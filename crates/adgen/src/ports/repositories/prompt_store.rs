//! Prompt Store Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{PipelineError, PromptKind, PromptTemplate};

/// Repository interface for prompt templates
#[async_trait]
pub trait PromptStore: Send + Sync {
    /// All active templates for a category + kind
    async fn find_active(
        &self,
        category: &str,
        kind: PromptKind,
    ) -> Result<Vec<PromptTemplate>, PipelineError>;

    async fn get(&self, id: Uuid) -> Result<Option<PromptTemplate>, PipelineError>;

    /// Insert or replace a template by id
    async fn save(&self, template: &PromptTemplate) -> Result<(), PipelineError>;
}
