//! In-memory implementation of SessionStore.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use adgen::domain::{GenerationSession, PipelineError};
use adgen::ports::SessionStore;

/// In-memory generation session store
#[derive(Default)]
pub struct MemSessionStore {
    sessions: RwLock<HashMap<String, GenerationSession>>,
}

impl MemSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemSessionStore {
    async fn get(&self, id: &str) -> Result<Option<GenerationSession>, PipelineError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn save(&self, session: &GenerationSession) -> Result<(), PipelineError> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }
}
