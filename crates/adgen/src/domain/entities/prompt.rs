//! Prompt - Versioned prompt templates with sector overrides.
//!
//! Templates are administered out of band; versions are appended by the
//! registry optimizer and never deleted. Exactly one version is current
//! at a time, and a deprecated version never becomes current again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a template generates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Text,
    Image,
}

/// Model parameters attached to a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParameters {
    pub temperature: f32,
    pub max_tokens: u32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for PromptParameters {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2048,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

/// Caching policy for results produced with this template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CachingPolicy {
    pub enabled: bool,
    pub ttl_secs: u64,
    /// Context fields composed into the cache key
    pub key_fields: Vec<String>,
}

/// Running metrics for one prompt version
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VersionMetrics {
    pub success_rate: f64,
    pub average_execution_time_ms: f64,
    pub token_count: u32,
    pub total_runs: u64,
    pub successful_runs: u64,
    pub last_successful_run: Option<DateTime<Utc>>,
}

/// One immutable revision of a template's content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptVersion {
    pub version: String,
    pub content: String,
    pub metrics: VersionMetrics,
    pub created_at: DateTime<Utc>,
    /// Once set, this version can never become current again
    pub deprecated_at: Option<DateTime<Utc>>,
}

impl PromptVersion {
    pub fn new(version: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            content: content.into(),
            metrics: VersionMetrics::default(),
            created_at: Utc::now(),
            deprecated_at: None,
        }
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated_at.is_some()
    }
}

/// A from/to pair in a sector transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

/// Ordered text transform applied to a template for one sector:
/// append additions, strip removals, apply replacements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectorTransform {
    pub additions: Vec<String>,
    pub removals: Vec<String>,
    pub replacements: Vec<Replacement>,
}

/// Observed performance of a sector override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectorPerformance {
    pub success_rate: f64,
    pub average_score: f64,
    pub sample_size: u64,
}

/// Domain-specific customization of a base template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorOverride {
    pub sector: String,
    pub transform: SectorTransform,
    pub performance: SectorPerformance,
}

/// Record of one self-optimization pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRecord {
    pub date: DateTime<Utc>,
    pub changes: Vec<String>,
    /// Measured after the new version has accumulated runs
    pub impact: f64,
}

/// A versioned prompt template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: Uuid,
    pub category: String,
    pub kind: PromptKind,
    pub versions: Vec<PromptVersion>,
    pub current_version: String,
    pub sector_overrides: Vec<SectorOverride>,
    pub parameters: PromptParameters,
    pub caching: CachingPolicy,
    pub active: bool,
    pub optimization_history: Vec<OptimizationRecord>,
    pub created_at: DateTime<Utc>,
}

impl PromptTemplate {
    /// Create a template with a single initial version "v1"
    pub fn new(category: impl Into<String>, kind: PromptKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            kind,
            versions: vec![PromptVersion::new("v1", content)],
            current_version: "v1".to_string(),
            sector_overrides: Vec::new(),
            parameters: PromptParameters::default(),
            caching: CachingPolicy::default(),
            active: true,
            optimization_history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn current(&self) -> Option<&PromptVersion> {
        self.versions.iter().find(|v| v.version == self.current_version)
    }

    pub fn current_mut(&mut self) -> Option<&mut PromptVersion> {
        let current = self.current_version.clone();
        self.versions.iter_mut().find(|v| v.version == current)
    }

    pub fn override_for(&self, sector: &str) -> Option<&SectorOverride> {
        self.sector_overrides.iter().find(|o| o.sector == sector)
    }

    /// Success rate averaged over all versions that have recorded runs.
    pub fn global_success_rate(&self) -> f64 {
        let rated: Vec<f64> = self
            .versions
            .iter()
            .filter(|v| v.metrics.total_runs > 0)
            .map(|v| v.metrics.successful_runs as f64 / v.metrics.total_runs as f64)
            .collect();
        if rated.is_empty() {
            return 0.0;
        }
        rated.iter().sum::<f64>() / rated.len() as f64
    }

    /// Sector-specific success rate, falling back to the global rate.
    pub fn success_rate_for(&self, sector: &str) -> f64 {
        self.override_for(sector)
            .filter(|o| o.performance.sample_size > 0)
            .map(|o| o.performance.success_rate)
            .unwrap_or_else(|| self.global_success_rate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_version_lookup() {
        let template = PromptTemplate::new("social_post", PromptKind::Text, "write a post");
        assert_eq!(template.current().unwrap().version, "v1");
        assert_eq!(template.current().unwrap().content, "write a post");
    }

    #[test]
    fn test_sector_rate_falls_back_to_global() {
        let mut template = PromptTemplate::new("social_post", PromptKind::Text, "write a post");
        let v = template.current_mut().unwrap();
        v.metrics.total_runs = 10;
        v.metrics.successful_runs = 8;

        // No override recorded for this sector yet
        assert!((template.success_rate_for("finance") - 0.8).abs() < f64::EPSILON);

        template.sector_overrides.push(SectorOverride {
            sector: "finance".to_string(),
            transform: SectorTransform::default(),
            performance: SectorPerformance {
                success_rate: 0.95,
                average_score: 88.0,
                sample_size: 20,
            },
        });
        assert!((template.success_rate_for("finance") - 0.95).abs() < f64::EPSILON);
    }
}
