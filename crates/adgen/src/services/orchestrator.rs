//! Generation Orchestrator - the generate-validate-retry loop.
//!
//! One call drives up to three attempts. Each rejection relaxes the
//! acceptance threshold by five points, each attempt diversifies the
//! prompt, and every attempt is recorded in the session whether it was
//! accepted or not. Transient image failures are retried in place with
//! backoff and never consume a quality attempt. Exhausting the budget
//! is a hard error; quality is never silently degraded below the
//! relaxed floor.
//!
//! The fingerprint is computed once per request, before any
//! per-attempt diversification, so retried requests and repeated
//! requests land on the same cache key.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    ArtifactRef, AttemptMetadata, GenerationAttempt, GenerationContext, GenerationParams,
    GenerationSession, PipelineError, PromptKind, QualityTier, ValidationResult,
};
use crate::ports::ImageGenerator;
use crate::services::cache::ArtifactCache;
use crate::services::fingerprint::{context_fingerprint, request_fingerprint};
use crate::services::prompt_builder;
use crate::services::registry::{ExecutionReport, PromptRegistry};
use crate::services::session::SessionTracker;
use crate::services::validator::QualityValidator;

/// One generation request
#[derive(Debug, Clone)]
pub struct GenerationSpec {
    pub session_id: String,
    /// Registry category the prompt template is drawn from
    pub category: String,
    /// Caller-supplied scene, used instead of the template content
    pub base_prompt: Option<String>,
    pub params: Option<GenerationParams>,
    pub context: GenerationContext,
    pub skip_cache: bool,
}

impl GenerationSpec {
    pub fn new(session_id: impl Into<String>, context: GenerationContext) -> Self {
        Self {
            session_id: session_id.into(),
            category: "visual".to_string(),
            base_prompt: None,
            params: None,
            context,
            skip_cache: false,
        }
    }
}

/// An accepted artifact, with the validation that accepted it
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub artifact: ArtifactRef,
    pub score: u8,
    pub quality: QualityTier,
    pub validation: ValidationResult,
    pub session_id: String,
    pub attempts_used: u32,
    pub from_cache: bool,
}

/// The generate-validate-retry loop over its collaborators
pub struct GenerationOrchestrator {
    registry: PromptRegistry,
    validator: QualityValidator,
    cache: ArtifactCache,
    sessions: SessionTracker,
    image_generator: Arc<dyn ImageGenerator>,
}

impl GenerationOrchestrator {
    /// Hard cap on attempts, over the whole session history
    pub const MAX_ATTEMPTS: u32 = 3;
    /// Acceptance threshold for the first attempt
    pub const BASE_THRESHOLD: u8 = 85;
    /// Threshold relaxation per rejected attempt
    pub const THRESHOLD_DECAY: u8 = 5;
    /// Extra image requests tolerated per attempt on transient failure
    const TRANSIENT_RETRIES: u32 = 2;
    /// Base delay before a transient retry, doubled each time
    const TRANSIENT_RETRY_DELAY: Duration = Duration::from_millis(500);

    pub fn new(
        registry: PromptRegistry,
        validator: QualityValidator,
        cache: ArtifactCache,
        sessions: SessionTracker,
        image_generator: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            registry,
            validator,
            cache,
            sessions,
            image_generator,
        }
    }

    /// Acceptance threshold for a given attempt number: 85, 80, 75.
    pub fn required_score(attempt: u32) -> u8 {
        Self::BASE_THRESHOLD - Self::THRESHOLD_DECAY * (attempt.saturating_sub(1) as u8)
    }

    /// Run the full loop for a fresh request.
    pub async fn generate(
        &self,
        spec: &GenerationSpec,
    ) -> Result<GeneratedArtifact, PipelineError> {
        let session = self.sessions.open(&spec.session_id).await?;
        if session.is_terminal() {
            return Err(PipelineError::SessionState(format!(
                "session {} is already {:?}",
                session.id, session.status
            )));
        }
        self.run(spec, session).await
    }

    /// Pick up an interrupted session. Attempt numbering continues
    /// where the history stopped, so the global cap still binds.
    pub async fn resume(
        &self,
        spec: &GenerationSpec,
    ) -> Result<GeneratedArtifact, PipelineError> {
        let info = self.sessions.resume(&spec.session_id).await?;
        self.run(spec, info.session).await
    }

    async fn run(
        &self,
        spec: &GenerationSpec,
        mut session: GenerationSession,
    ) -> Result<GeneratedArtifact, PipelineError> {
        let sector = spec.context.sector.clone();
        let params = spec.params.clone().unwrap_or_else(|| GenerationParams {
            aspect_ratio: spec.context.purpose.aspect_ratio().to_string(),
            ..GenerationParams::default()
        });

        // Resolve the scene first so cache keys and attempts agree
        let template = self
            .registry
            .get_optimized_prompt(&spec.category, PromptKind::Image, &sector, &spec.context)
            .await?;
        let scene = match (&spec.base_prompt, &template) {
            (Some(base), _) => base.clone(),
            (None, Some(t)) => t
                .current()
                .map(|v| v.content.clone())
                .ok_or_else(|| {
                    PipelineError::Configuration(format!(
                        "template {} has no current version",
                        t.id
                    ))
                })?,
            (None, None) => {
                return Err(PipelineError::Configuration(format!(
                    "no prompt template for category '{}' and no base prompt given",
                    spec.category
                )))
            }
        };
        let template_id = template.as_ref().map(|t| t.id);

        let prompt = prompt_builder::build_image_prompt(&scene, &spec.context);
        let fingerprint = request_fingerprint(&prompt, &params, &spec.context);

        if !spec.skip_cache {
            if let Some(hit) = self.cache.lookup(&fingerprint).await {
                // The cache only ever holds accepted artifacts
                return Ok(GeneratedArtifact {
                    artifact: hit.artifact,
                    score: hit.score,
                    quality: QualityTier::High,
                    validation: hit.validation,
                    session_id: session.id.clone(),
                    attempts_used: 0,
                    from_cache: true,
                });
            }
        } else if let Err(e) = self.cache.invalidate(&fingerprint).await {
            // A skip_cache request retires any existing entry for the key
            tracing::warn!("Failed to invalidate cache entry {}: {}", fingerprint, e);
        }

        let start_attempt = session.next_attempt_number();
        if start_attempt > Self::MAX_ATTEMPTS {
            let best_score = session
                .attempts
                .iter()
                .map(|a| a.validation_score)
                .max()
                .unwrap_or(0);
            self.sessions.close(&mut session, false).await?;
            return Err(PipelineError::QualityExhausted {
                attempts: Self::MAX_ATTEMPTS,
                best_score,
            });
        }

        let mut best_score: u8 = session
            .attempts
            .iter()
            .map(|a| a.validation_score)
            .max()
            .unwrap_or(0);

        for attempt in start_attempt..=Self::MAX_ATTEMPTS {
            let required = Self::required_score(attempt);
            let attempt_prompt = prompt_builder::diversify(&prompt, attempt);
            tracing::info!(
                "🎨 Attempt {}/{} for session {} (required score {})",
                attempt,
                Self::MAX_ATTEMPTS,
                session.id,
                required
            );

            let started = Instant::now();
            let request = crate::ports::ImageRequest {
                prompt: attempt_prompt.clone(),
                negative_prompt: prompt_builder::negative_prompt().to_string(),
                aspect_ratio: params.aspect_ratio.clone(),
                reference_image: None,
            };

            let artifact = match self.generate_with_retries(&request).await {
                Ok(artifact) => artifact,
                Err(e) => {
                    self.sessions.close(&mut session, false).await?;
                    return Err(e);
                }
            };

            let validation = self.validator.validate(&artifact, &spec.context).await;
            let score = validation.score;
            let accepted = score >= required;
            best_score = best_score.max(score);

            let session_id = session.id.clone();
            self.sessions
                .record_attempt(
                    &mut session,
                    GenerationAttempt {
                        id: Uuid::new_v4(),
                        session_id,
                        attempt_number: attempt,
                        prompt_text: attempt_prompt,
                        params: params.clone(),
                        artifact: Some(artifact.clone()),
                        validation_score: score,
                        validation: validation.clone(),
                        metadata: AttemptMetadata {
                            purpose: spec.context.purpose.as_str().to_string(),
                            quality: validation.quality,
                        },
                        recorded_at: Utc::now(),
                    },
                )
                .await?;

            if let Some(id) = template_id {
                self.registry
                    .record_execution(
                        id,
                        &ExecutionReport {
                            success: accepted,
                            execution_time_ms: started.elapsed().as_millis() as u64,
                            token_count: None,
                            score: Some(score),
                        },
                        &sector,
                    )
                    .await;
            }

            if accepted {
                tracing::info!(
                    "✅ Accepted artifact for session {} at attempt {} (score {} >= {})",
                    session.id,
                    attempt,
                    score,
                    required
                );
                self.cache
                    .store_accepted(
                        fingerprint.clone(),
                        context_fingerprint(&spec.context),
                        artifact.clone(),
                        &validation,
                    )
                    .await;
                self.sessions.close(&mut session, true).await?;
                return Ok(GeneratedArtifact {
                    artifact,
                    score,
                    quality: validation.quality,
                    validation,
                    session_id: session.id.clone(),
                    attempts_used: attempt,
                    from_cache: false,
                });
            }

            tracing::warn!(
                "Rejected artifact for session {} at attempt {} (score {} < {})",
                session.id,
                attempt,
                score,
                required
            );
        }

        self.sessions.close(&mut session, false).await?;
        Err(PipelineError::QualityExhausted {
            attempts: Self::MAX_ATTEMPTS,
            best_score,
        })
    }

    /// One image request with its own retry budget. Transient failures
    /// are retried with doubling backoff without burning a quality
    /// attempt; anything else propagates immediately.
    async fn generate_with_retries(
        &self,
        request: &crate::ports::ImageRequest,
    ) -> Result<ArtifactRef, PipelineError> {
        let mut retry = 0u32;
        loop {
            match self.image_generator.generate_image(request).await {
                Ok(response) => return Ok(response.artifact_url),
                Err(e) if e.is_transient() && retry < Self::TRANSIENT_RETRIES => {
                    let delay = Self::TRANSIENT_RETRY_DELAY * 2u32.pow(retry);
                    tracing::warn!(
                        "Image generation failed, retrying in {:?}: {}",
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    retry += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
