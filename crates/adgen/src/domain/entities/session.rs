//! Session - Attempt tracking for one logical generation request.
//!
//! A session is created at the first attempt, mutated by the
//! orchestrator and terminal once completed or failed. Attempt numbers
//! are strictly increasing and never reset, which keeps the global
//! attempt cap effective across a resume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{ArtifactRef, QualityTier};
use crate::domain::ValidationResult;

/// Parameters sent to the image collaborator for one attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub aspect_ratio: String,
    pub samples: u32,
    pub cfg_scale: f32,
    pub steps: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            aspect_ratio: "1:1".to_string(),
            samples: 1,
            cfg_scale: 0.0,
            steps: 0,
        }
    }
}

/// Audit metadata attached to each attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptMetadata {
    pub purpose: String,
    pub quality: QualityTier,
}

/// One generate-then-validate cycle within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationAttempt {
    pub id: Uuid,
    pub session_id: String,
    pub attempt_number: u32,
    pub prompt_text: String,
    pub params: GenerationParams,
    pub artifact: Option<ArtifactRef>,
    pub validation_score: u8,
    pub validation: ValidationResult,
    pub metadata: AttemptMetadata,
    pub recorded_at: DateTime<Utc>,
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Failed,
}

/// Logical grouping of attempts for one requested artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSession {
    pub id: String,
    pub status: SessionStatus,
    pub attempts: Vec<GenerationAttempt>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl GenerationSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: SessionStatus::Active,
            attempts: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.status, SessionStatus::Active)
    }

    pub fn last_attempt(&self) -> Option<&GenerationAttempt> {
        self.attempts.last()
    }

    /// Next attempt number, monotonic over the whole session history.
    pub fn next_attempt_number(&self) -> u32 {
        self.last_attempt().map(|a| a.attempt_number + 1).unwrap_or(1)
    }

    /// Close the session. Terminal, the status never changes afterwards.
    pub fn complete(&mut self, success: bool) {
        self.status = if success {
            SessionStatus::Completed
        } else {
            SessionStatus::Failed
        };
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_numbers_monotonic() {
        let session = GenerationSession::new("brand-x-1700000000");
        assert_eq!(session.next_attempt_number(), 1);
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut session = GenerationSession::new("brand-x-1700000000");
        session.complete(true);
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.is_terminal());
        assert!(session.completed_at.is_some());
    }
}
