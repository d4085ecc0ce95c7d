//! Session Tracker - attempt history and resume support.
//!
//! Sessions record every attempt the orchestrator makes, accepted and
//! rejected alike, so the full history survives a crash. Resuming is
//! only legal on a live session; attempt numbers continue where the
//! history left off so the global cap stays effective.

use std::sync::Arc;

use crate::domain::{GenerationAttempt, GenerationSession, PipelineError};
use crate::ports::SessionStore;

/// Where a resumed session picks up
#[derive(Debug, Clone)]
pub struct ResumeInfo {
    pub session: GenerationSession,
    pub next_attempt_number: u32,
}

/// Attempt bookkeeping over the session store
pub struct SessionTracker {
    store: Arc<dyn SessionStore>,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Load a session or create a fresh active one under this id.
    pub async fn open(&self, id: &str) -> Result<GenerationSession, PipelineError> {
        if let Some(session) = self.store.get(id).await? {
            return Ok(session);
        }
        let session = GenerationSession::new(id);
        self.store.save(&session).await?;
        tracing::info!("Opened generation session {}", id);
        Ok(session)
    }

    /// Load an existing session for resumption. Missing sessions and
    /// terminal sessions are both errors; attempt numbering continues
    /// after the last recorded attempt.
    pub async fn resume(&self, id: &str) -> Result<ResumeInfo, PipelineError> {
        let session = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::not_found("session", id))?;

        if session.is_terminal() {
            return Err(PipelineError::SessionState(format!(
                "session {} is already {:?}",
                id, session.status
            )));
        }
        if session.attempts.is_empty() {
            return Err(PipelineError::SessionState(format!(
                "session {} has no attempts to resume from",
                id
            )));
        }

        let next_attempt_number = session.next_attempt_number();
        tracing::info!(
            "Resuming session {} at attempt {}",
            id,
            next_attempt_number
        );
        Ok(ResumeInfo {
            session,
            next_attempt_number,
        })
    }

    /// Append one attempt to the session history and persist.
    pub async fn record_attempt(
        &self,
        session: &mut GenerationSession,
        attempt: GenerationAttempt,
    ) -> Result<(), PipelineError> {
        session.attempts.push(attempt);
        self.store.save(session).await
    }

    /// Flip the session to its terminal status and persist.
    pub async fn close(
        &self,
        session: &mut GenerationSession,
        success: bool,
    ) -> Result<(), PipelineError> {
        session.complete(success);
        self.store.save(session).await?;
        tracing::info!(
            "Closed session {} as {:?} after {} attempts",
            session.id,
            session.status,
            session.attempts.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ArtifactRef, AttemptMetadata, GenerationParams, QualityTier, SessionStatus,
        ValidationResult,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use tokio::sync::RwLock;
    use uuid::Uuid;

    struct TestSessionStore {
        sessions: RwLock<HashMap<String, GenerationSession>>,
    }

    impl TestSessionStore {
        fn empty() -> Arc<Self> {
            Arc::new(Self {
                sessions: RwLock::new(HashMap::new()),
            })
        }
    }

    #[async_trait]
    impl SessionStore for TestSessionStore {
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

    fn attempt(session_id: &str, number: u32, score: u8) -> GenerationAttempt {
        GenerationAttempt {
            id: Uuid::new_v4(),
            session_id: session_id.to_string(),
            attempt_number: number,
            prompt_text: "a scene".to_string(),
            params: GenerationParams::default(),
            artifact: Some(ArtifactRef::new("https://cdn.example/1.png")),
            validation_score: score,
            validation: ValidationResult::passing(score),
            metadata: AttemptMetadata {
                purpose: "social".to_string(),
                quality: QualityTier::from_score(score),
            },
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_open_creates_then_reuses() {
        let tracker = SessionTracker::new(TestSessionStore::empty());
        let mut session = tracker.open("s-1").await.unwrap();
        tracker
            .record_attempt(&mut session, attempt("s-1", 1, 80))
            .await
            .unwrap();

        let reopened = tracker.open("s-1").await.unwrap();
        assert_eq!(reopened.attempts.len(), 1);
        assert_eq!(reopened.status, SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_resume_continues_numbering() {
        let tracker = SessionTracker::new(TestSessionStore::empty());
        let mut session = tracker.open("s-2").await.unwrap();
        tracker
            .record_attempt(&mut session, attempt("s-2", 1, 60))
            .await
            .unwrap();
        tracker
            .record_attempt(&mut session, attempt("s-2", 2, 65))
            .await
            .unwrap();

        let info = tracker.resume("s-2").await.unwrap();
        assert_eq!(info.next_attempt_number, 3);
    }

    #[tokio::test]
    async fn test_resume_missing_session_fails() {
        let tracker = SessionTracker::new(TestSessionStore::empty());
        let err = tracker.resume("nope").await.unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resume_without_attempts_fails() {
        let tracker = SessionTracker::new(TestSessionStore::empty());
        tracker.open("s-5").await.unwrap();
        let err = tracker.resume("s-5").await.unwrap_err();
        assert!(matches!(err, PipelineError::SessionState(_)));
    }

    #[tokio::test]
    async fn test_resume_terminal_session_fails() {
        let tracker = SessionTracker::new(TestSessionStore::empty());
        let mut session = tracker.open("s-3").await.unwrap();
        tracker.close(&mut session, true).await.unwrap();

        let err = tracker.resume("s-3").await.unwrap_err();
        assert!(matches!(err, PipelineError::SessionState(_)));
    }
}
