//! Adgen Domain Library
//!
//! Core types and services for the adaptive generation pipeline:
//! prompt versioning and optimization, quality validation, the
//! retry-and-validate generation loop, validated-artifact caching,
//! session-based attempt tracking and resilient job polling.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (PromptTemplate, GenerationSession, CacheEntry, ...)
//!   - `value_objects/`: Immutable value types (QualityTier, Fingerprint, ArtifactRef)
//!   - `errors/`: Pipeline error taxonomy
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Prompt / session / cache store interfaces
//!   - `services/`: External collaborator interfaces (text and image
//!     generators, job status source, criterion scorers)
//!
//! - **Services** (`services/`): The pipeline itself
//!   - `PromptRegistry`, `QualityValidator`, `GenerationOrchestrator`,
//!     `SessionTracker`, `ArtifactCache`, `ProgressPoller`
//!
//! # Usage
//!
//! ```rust,ignore
//! use adgen::services::GenerationOrchestrator;
//! use adgen::ports::{PromptStore, SessionStore, CacheStore, ImageGenerator};
//! ```

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use domain::{
    ArtifactRef, AttemptMetadata, CacheEntry, CriterionCategory, CriterionScore, Fingerprint,
    GenerationAttempt, GenerationContext, GenerationParams, GenerationSession, JobState,
    JobStatusReport, OptimizationRecord, PipelineError, PipelineStep, PromptKind,
    PromptParameters, PromptTemplate, PromptVersion, Purpose, QualityTier, Replacement,
    SectorOverride, SectorPerformance, SectorTransform, SessionStatus, TrackedItem,
    ValidationResult, VersionMetrics,
};
pub use ports::{
    CacheStore, Criterion, CriterionScorer, ImageGenerator, ImageRequest, ImageResponse,
    PromptStore, ScorerError, ScorerSignal, SessionStore, StatusSource, TextGenerator,
    TextMessage, TextRequest, TextResponse,
};
pub use services::{
    ArtifactCache, CancelHandle, ExecutionReport, GeneratedArtifact, GenerationOrchestrator,
    GenerationSpec, PollOutcome, PollPhase, PollerConfig, ProgressPoller, ProgressUpdate,
    PromptRegistry, QualityValidator, ResumeInfo, SessionTracker, ValidatorConfig,
};
