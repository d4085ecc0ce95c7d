//! Quality Validator - weighted multi-criteria artifact scoring.
//!
//! Evaluates every criterion through the scorer port, substitutes
//! neutral defaults where signal is missing and folds the weighted sum
//! into a tiered result. Validation never blocks a pipeline: after the
//! retry budget is spent it degrades to a low-tier default instead of
//! surfacing an error.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{
    AdvertisingEffectiveness, ArtifactRef, CriterionCategory, CriterionScore, GenerationContext,
    QualityTier, ValidationResult,
};
use crate::ports::{Criterion, CriterionScorer, ScorerError};

/// Retry behavior for transient scorer failures
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Multi-criteria artifact validator
pub struct QualityValidator {
    scorer: Arc<dyn CriterionScorer>,
    config: ValidatorConfig,
}

impl QualityValidator {
    /// Score assigned when the validation engine is unreachable
    const DEGRADED_SCORE: u8 = 70;
    /// Criteria scoring below this feed the suggestion list
    const SUGGESTION_THRESHOLD: u8 = QualityTier::MEDIUM_THRESHOLD;
    /// Advertising criteria at or above this count as strengths
    const STRENGTH_THRESHOLD: u8 = 85;
    /// Advertising criteria below this count as weaknesses
    const WEAKNESS_THRESHOLD: u8 = 75;

    pub fn new(scorer: Arc<dyn CriterionScorer>) -> Self {
        Self::with_config(scorer, ValidatorConfig::default())
    }

    pub fn with_config(scorer: Arc<dyn CriterionScorer>, config: ValidatorConfig) -> Self {
        Self { scorer, config }
    }

    /// Validate one artifact. A transient scorer failure fails the
    /// whole pass and the pass is retried after a fixed delay; once
    /// retries are exhausted a degraded low-tier result is returned.
    pub async fn validate(
        &self,
        artifact: &ArtifactRef,
        context: &GenerationContext,
    ) -> ValidationResult {
        for attempt in 1..=self.config.max_retries {
            match self.validate_once(artifact, context).await {
                Ok(result) => {
                    tracing::debug!(
                        "Validated {} -> score {} ({})",
                        artifact,
                        result.score,
                        result.quality
                    );
                    return result;
                }
                Err(e) => {
                    tracing::warn!(
                        "Validation pass {}/{} failed for {}: {}",
                        attempt,
                        self.config.max_retries,
                        artifact,
                        e
                    );
                    if attempt < self.config.max_retries {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        tracing::warn!("Validation degraded to default for {}", artifact);
        Self::degraded_result()
    }

    async fn validate_once(
        &self,
        artifact: &ArtifactRef,
        context: &GenerationContext,
    ) -> Result<ValidationResult, ScorerError> {
        let mut details = Vec::with_capacity(Criterion::ALL.len());
        let mut technical_issues = Vec::new();
        let mut style_issues = Vec::new();
        let mut sector_issues = Vec::new();

        for criterion in Criterion::ALL {
            let score = match self.scorer.evaluate(criterion, artifact, context).await {
                Ok(signal) => {
                    technical_issues.extend(signal.technical_issues);
                    style_issues.extend(signal.style_issues);
                    sector_issues.extend(signal.sector_issues);
                    signal.score.unwrap_or_else(|| criterion.neutral_default())
                }
                Err(ScorerError::Unavailable) => criterion.neutral_default(),
                Err(e @ ScorerError::Transient(_)) => return Err(e),
            };

            details.push(CriterionScore {
                criterion: criterion.name().to_string(),
                score,
                feedback: feedback_for(criterion, score),
                category: criterion.category(),
            });
        }

        let weighted: f64 = Criterion::ALL
            .iter()
            .zip(&details)
            .map(|(c, d)| c.weight() * d.score as f64)
            .sum();
        let score = weighted.round().clamp(0.0, 100.0) as u8;

        let suggestions = details
            .iter()
            .filter(|d| d.score < Self::SUGGESTION_THRESHOLD)
            .map(|d| format!("Improve {}: currently at {}", d.criterion, d.score))
            .collect();

        Ok(ValidationResult {
            score,
            quality: QualityTier::from_score(score),
            advertising: advertising_summary(&details),
            details,
            suggestions,
            technical_issues,
            style_issues,
            sector_issues,
        })
    }

    fn degraded_result() -> ValidationResult {
        ValidationResult {
            score: Self::DEGRADED_SCORE,
            quality: QualityTier::from_score(Self::DEGRADED_SCORE),
            details: Vec::new(),
            suggestions: vec!["Validation engine unavailable, score defaulted".to_string()],
            technical_issues: Vec::new(),
            style_issues: Vec::new(),
            sector_issues: Vec::new(),
            advertising: AdvertisingEffectiveness::default(),
        }
    }
}

fn feedback_for(criterion: Criterion, score: u8) -> String {
    let verdict = match score {
        90..=u8::MAX => "excellent",
        80..=89 => "good",
        70..=79 => "acceptable",
        _ => "needs work",
    };
    format!("{}: {}", criterion.name(), verdict)
}

/// Normalize the advertising-category criteria into a 0-100 summary
/// with named strengths and weaknesses.
fn advertising_summary(details: &[CriterionScore]) -> AdvertisingEffectiveness {
    let (mut weighted, mut weight_total) = (0.0f64, 0.0f64);
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for (criterion, detail) in Criterion::ALL.iter().zip(details) {
        if detail.category != CriterionCategory::Advertising {
            continue;
        }
        weighted += criterion.weight() * detail.score as f64;
        weight_total += criterion.weight();
        if detail.score >= QualityValidator::STRENGTH_THRESHOLD {
            strengths.push(detail.criterion.clone());
        } else if detail.score < QualityValidator::WEAKNESS_THRESHOLD {
            weaknesses.push(detail.criterion.clone());
        }
    }

    let score = if weight_total > 0.0 {
        (weighted / weight_total).round() as u8
    } else {
        0
    };

    AdvertisingEffectiveness {
        score,
        strengths,
        weaknesses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Purpose;
    use crate::ports::ScorerSignal;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Scorer that fails transiently for the first N passes, then
    /// answers every criterion with a fixed score. A transient failure
    /// aborts the whole pass, so failed passes are counted per failure
    /// rather than derived from the call count.
    struct FlakyScorer {
        failing_passes: u32,
        failed_passes: AtomicU32,
        score: Option<u8>,
    }

    impl FlakyScorer {
        fn steady(score: Option<u8>) -> Self {
            Self {
                failing_passes: 0,
                failed_passes: AtomicU32::new(0),
                score,
            }
        }
    }

    #[async_trait]
    impl CriterionScorer for FlakyScorer {
        async fn evaluate(
            &self,
            _criterion: Criterion,
            _artifact: &ArtifactRef,
            _context: &GenerationContext,
        ) -> Result<ScorerSignal, ScorerError> {
            if self.failed_passes.load(Ordering::SeqCst) < self.failing_passes {
                self.failed_passes.fetch_add(1, Ordering::SeqCst);
                return Err(ScorerError::Transient("scorer offline".to_string()));
            }
            match self.score {
                Some(s) => Ok(ScorerSignal {
                    score: Some(s),
                    ..Default::default()
                }),
                None => Err(ScorerError::Unavailable),
            }
        }
    }

    struct UnavailableScorer;

    #[async_trait]
    impl CriterionScorer for UnavailableScorer {
        async fn evaluate(
            &self,
            _criterion: Criterion,
            _artifact: &ArtifactRef,
            _context: &GenerationContext,
        ) -> Result<ScorerSignal, ScorerError> {
            Err(ScorerError::Unavailable)
        }
    }

    fn fast_config() -> ValidatorConfig {
        ValidatorConfig {
            max_retries: 3,
            retry_delay: Duration::ZERO,
        }
    }

    fn artifact() -> ArtifactRef {
        ArtifactRef::new("https://cdn.example/img/1.png")
    }

    fn context() -> GenerationContext {
        GenerationContext::new(Purpose::Social, "food")
    }

    #[tokio::test]
    async fn test_uniform_scores_give_that_score() {
        let validator =
            QualityValidator::with_config(Arc::new(FlakyScorer::steady(Some(92))), fast_config());
        let result = validator.validate(&artifact(), &context()).await;
        assert_eq!(result.score, 92);
        assert_eq!(result.quality, QualityTier::High);
        assert_eq!(result.details.len(), Criterion::ALL.len());
        assert!(result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_signal_uses_neutral_defaults() {
        let validator =
            QualityValidator::with_config(Arc::new(UnavailableScorer), fast_config());
        let result = validator.validate(&artifact(), &context()).await;

        let expected: f64 = Criterion::ALL
            .iter()
            .map(|c| c.weight() * c.neutral_default() as f64)
            .sum();
        assert_eq!(result.score, expected.round() as u8);
        assert_eq!(result.quality, QualityTier::Medium);
    }

    #[tokio::test]
    async fn test_transient_failure_recovers_on_retry() {
        let scorer = FlakyScorer {
            failing_passes: 2,
            failed_passes: AtomicU32::new(0),
            score: Some(88),
        };
        let validator = QualityValidator::with_config(Arc::new(scorer), fast_config());
        let result = validator.validate(&artifact(), &context()).await;
        assert_eq!(result.score, 88);
    }

    #[tokio::test]
    async fn test_exhausted_retries_degrade_to_default() {
        let scorer = FlakyScorer {
            failing_passes: 10,
            failed_passes: AtomicU32::new(0),
            score: Some(88),
        };
        let validator = QualityValidator::with_config(Arc::new(scorer), fast_config());
        let result = validator.validate(&artifact(), &context()).await;
        assert_eq!(result.score, QualityValidator::DEGRADED_SCORE);
        assert_eq!(result.quality, QualityTier::Low);
        assert!(!result.suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_low_scores_produce_suggestions() {
        let validator =
            QualityValidator::with_config(Arc::new(FlakyScorer::steady(Some(72))), fast_config());
        let result = validator.validate(&artifact(), &context()).await;
        assert_eq!(result.suggestions.len(), Criterion::ALL.len());
        assert_eq!(result.quality, QualityTier::Low);
        assert_eq!(result.advertising.weaknesses.len(), 5);
    }
}
