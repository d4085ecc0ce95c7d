//! Criterion Scorer Port
//!
//! Pluggable sub-evaluators for the quality validator. Each criterion
//! is resolved to a scorer at startup; when a scorer has no signal for
//! an artifact the validator substitutes a neutral default instead of
//! failing.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ArtifactRef, CriterionCategory, GenerationContext};

/// A quality criterion with a fixed weight.
///
/// Technical and advertising-effectiveness weights sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    // Technical
    Composition,
    Lighting,
    Color,
    Sharpness,
    Style,
    // Advertising effectiveness
    VisualImpact,
    BrandConsistency,
    NarrativeClarity,
    EmotionalResonance,
    Memorability,
}

impl Criterion {
    pub const ALL: [Criterion; 10] = [
        Criterion::Composition,
        Criterion::Lighting,
        Criterion::Color,
        Criterion::Sharpness,
        Criterion::Style,
        Criterion::VisualImpact,
        Criterion::BrandConsistency,
        Criterion::NarrativeClarity,
        Criterion::EmotionalResonance,
        Criterion::Memorability,
    ];

    pub fn weight(&self) -> f64 {
        match self {
            Criterion::Composition => 0.15,
            Criterion::Lighting => 0.15,
            Criterion::Color => 0.15,
            Criterion::Sharpness => 0.10,
            Criterion::Style => 0.10,
            Criterion::VisualImpact => 0.10,
            Criterion::BrandConsistency => 0.10,
            Criterion::NarrativeClarity => 0.05,
            Criterion::EmotionalResonance => 0.05,
            Criterion::Memorability => 0.05,
        }
    }

    /// Score substituted when the scorer has no signal for an artifact
    pub fn neutral_default(&self) -> u8 {
        match self {
            Criterion::Composition => 85,
            Criterion::Lighting => 80,
            Criterion::Color => 90,
            Criterion::Sharpness => 85,
            Criterion::Style => 85,
            Criterion::VisualImpact => 80,
            Criterion::BrandConsistency => 85,
            Criterion::NarrativeClarity => 80,
            Criterion::EmotionalResonance => 85,
            Criterion::Memorability => 80,
        }
    }

    pub fn category(&self) -> CriterionCategory {
        match self {
            Criterion::Composition
            | Criterion::Lighting
            | Criterion::Color
            | Criterion::Sharpness
            | Criterion::Style => CriterionCategory::Technical,
            Criterion::VisualImpact
            | Criterion::BrandConsistency
            | Criterion::NarrativeClarity
            | Criterion::EmotionalResonance
            | Criterion::Memorability => CriterionCategory::Advertising,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Composition => "composition",
            Criterion::Lighting => "lighting",
            Criterion::Color => "color",
            Criterion::Sharpness => "sharpness",
            Criterion::Style => "style",
            Criterion::VisualImpact => "visual_impact",
            Criterion::BrandConsistency => "brand_consistency",
            Criterion::NarrativeClarity => "narrative_clarity",
            Criterion::EmotionalResonance => "emotional_resonance",
            Criterion::Memorability => "memorability",
        }
    }
}

/// Signal produced by a scorer for one criterion
#[derive(Debug, Clone, Default)]
pub struct ScorerSignal {
    /// None means no signal; the validator substitutes the neutral default
    pub score: Option<u8>,
    pub technical_issues: Vec<String>,
    pub style_issues: Vec<String>,
    pub sector_issues: Vec<String>,
}

/// Scorer failure modes
#[derive(Debug, Error)]
pub enum ScorerError {
    /// Retried by the validator with a fixed delay
    #[error("transient scorer failure: {0}")]
    Transient(String),

    /// Treated like a missing signal, never retried
    #[error("scorer signal unavailable")]
    Unavailable,
}

/// Sub-evaluator for quality criteria
#[async_trait]
pub trait CriterionScorer: Send + Sync {
    async fn evaluate(
        &self,
        criterion: Criterion,
        artifact: &ArtifactRef,
        context: &GenerationContext,
    ) -> Result<ScorerSignal, ScorerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Criterion::ALL.iter().map(|c| c.weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_criteria_split_into_two_categories() {
        assert_eq!(Criterion::Style.category(), CriterionCategory::Technical);
        let advertising = Criterion::ALL
            .iter()
            .filter(|c| c.category() == CriterionCategory::Advertising)
            .count();
        assert_eq!(advertising, 5);
    }

    #[test]
    fn test_neutral_defaults_in_range() {
        for c in Criterion::ALL {
            let d = c.neutral_default();
            assert!((70..=90).contains(&d), "{} default {} out of range", c.name(), d);
        }
    }
}
