//! Validation - Weighted quality scoring results.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::QualityTier;

/// Category a criterion belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriterionCategory {
    Technical,
    Advertising,
}

/// Score and feedback for one criterion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: String,
    pub score: u8,
    pub feedback: String,
    pub category: CriterionCategory,
}

/// Aggregated advertising-effectiveness summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvertisingEffectiveness {
    pub score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Result of validating one generated artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Weighted overall score, 0-100
    pub score: u8,
    pub quality: QualityTier,
    pub details: Vec<CriterionScore>,
    /// Actionable improvements for criteria below the medium tier
    pub suggestions: Vec<String>,
    pub technical_issues: Vec<String>,
    pub style_issues: Vec<String>,
    pub sector_issues: Vec<String>,
    pub advertising: AdvertisingEffectiveness,
}

impl ValidationResult {
    /// Empty passing result, used for cache hits where the stored
    /// validation detail is returned alongside.
    pub fn passing(score: u8) -> Self {
        Self {
            score,
            quality: QualityTier::from_score(score),
            details: Vec::new(),
            suggestions: Vec::new(),
            technical_issues: Vec::new(),
            style_issues: Vec::new(),
            sector_issues: Vec::new(),
            advertising: AdvertisingEffectiveness::default(),
        }
    }
}
