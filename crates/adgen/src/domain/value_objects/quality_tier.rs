//! Quality Tier
//!
//! Discretized bucket derived from a numeric validation score.

use serde::{Deserialize, Serialize};

/// Quality bucket for a validation score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Score >= 90
    High,
    /// Score >= 80
    Medium,
    /// Score >= 70
    Low,
    /// Anything under 70
    Below,
}

impl QualityTier {
    pub const HIGH_THRESHOLD: u8 = 90;
    pub const MEDIUM_THRESHOLD: u8 = 80;
    pub const LOW_THRESHOLD: u8 = 70;

    pub fn from_score(score: u8) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            QualityTier::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            QualityTier::Medium
        } else if score >= Self::LOW_THRESHOLD {
            QualityTier::Low
        } else {
            QualityTier::Below
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityTier::High => write!(f, "high"),
            QualityTier::Medium => write!(f, "medium"),
            QualityTier::Low => write!(f, "low"),
            QualityTier::Below => write!(f, "below"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(QualityTier::from_score(90), QualityTier::High);
        assert_eq!(QualityTier::from_score(89), QualityTier::Medium);
        assert_eq!(QualityTier::from_score(80), QualityTier::Medium);
        assert_eq!(QualityTier::from_score(79), QualityTier::Low);
        assert_eq!(QualityTier::from_score(70), QualityTier::Low);
        assert_eq!(QualityTier::from_score(69), QualityTier::Below);
    }
}
