//! Session Store Port

use async_trait::async_trait;

use crate::domain::{GenerationSession, PipelineError};

/// Repository interface for generation sessions.
///
/// Session ids are the sole isolation boundary between concurrent
/// generation requests; there is no locking primitive beyond the store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<GenerationSession>, PipelineError>;

    /// Insert or replace a session by id
    async fn save(&self, session: &GenerationSession) -> Result<(), PipelineError>;
}
