//! Pipeline Errors
//!
//! Error taxonomy for the generation pipeline. Transient errors are
//! retried with backoff, configuration errors fail fast, validation
//! engine errors degrade to a default score, and exhaustion of the
//! attempt budget is terminal.

use thiserror::Error;

/// Generation pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network / API timeout class failures. Retried by the caller.
    #[error("Transient error: {0}")]
    Transient(String),

    /// All attempts rejected below the relaxed quality threshold.
    /// Terminal: bubbles to the caller, no silent degradation.
    #[error("Generation failed after {attempts} attempts (best score {best_score})")]
    QualityExhausted { attempts: u32, best_score: u8 },

    /// Missing credentials, templates or other setup. No retry.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The validator itself failed. Callers degrade to a default score.
    #[error("Validation engine error: {0}")]
    ValidationEngine(String),

    /// Resume on a completed or non-existent session.
    #[error("Session state error: {0}")]
    SessionState(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl PipelineError {
    pub fn not_found<T: AsRef<str>, I: AsRef<str>>(entity_type: T, id: I) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.as_ref().to_string(),
        }
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Transient(_) | Self::ExternalService(_) | Self::Store(_)
        )
    }
}
