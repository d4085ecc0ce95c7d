//! Prompt Registry - versioned templates with self-optimization.
//!
//! Serves sector-optimized prompt copies, records execution metrics
//! with incremental averages and spawns a new template version when a
//! version underperforms. Metric and optimization failures are logged
//! and swallowed so that registry serving is never blocked by them.

use std::sync::Arc;

use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use crate::domain::{
    GenerationContext, OptimizationRecord, PipelineError, PromptKind, PromptTemplate,
    PromptVersion, SectorTransform,
};
use crate::ports::PromptStore;

/// Outcome of one execution against a template, fed back into metrics
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub success: bool,
    pub execution_time_ms: u64,
    /// Tokens spent, when the execution went through a text model
    pub token_count: Option<u32>,
    /// Validation score, when the execution produced a scored artifact
    pub score: Option<u8>,
}

/// Versioned prompt template registry
pub struct PromptRegistry {
    store: Arc<dyn PromptStore>,
}

impl PromptRegistry {
    /// Runs a version must accumulate before optimization is considered
    const MIN_RUNS_FOR_OPTIMIZATION: u64 = 50;
    /// Success rate below which an optimization pass is triggered
    const OPTIMIZATION_THRESHOLD: f64 = 0.85;
    /// Token usage fraction of the budget that triggers verbosity reduction
    const TOKEN_PRESSURE_RATIO: f64 = 0.9;

    pub fn new(store: Arc<dyn PromptStore>) -> Self {
        Self { store }
    }

    /// Select the best active template for category + kind and
    /// materialize a sector-optimized copy of its current version.
    ///
    /// Templates are ranked by sector-specific success rate, falling
    /// back to the global rate. Returns `None` when no template
    /// matches; the stored template is never mutated.
    pub async fn get_optimized_prompt(
        &self,
        category: &str,
        kind: PromptKind,
        sector: &str,
        _context: &GenerationContext,
    ) -> Result<Option<PromptTemplate>, PipelineError> {
        let candidates = self.store.find_active(category, kind).await?;

        let best = candidates
            .into_iter()
            .max_by(|a, b| {
                a.success_rate_for(sector)
                    .total_cmp(&b.success_rate_for(sector))
            });

        let Some(template) = best else {
            tracing::warn!(
                "No prompt template for category={} kind={:?} sector={}",
                category,
                kind,
                sector
            );
            return Ok(None);
        };

        let mut materialized = template.clone();
        if let Some(transform) = materialized
            .override_for(sector)
            .map(|o| o.transform.clone())
        {
            if let Some(version) = materialized.current_mut() {
                version.content = apply_transform(&version.content, &transform);
            }
        }

        Ok(Some(materialized))
    }

    /// Fold one execution outcome into the current version's metrics.
    ///
    /// Best-effort: store failures are logged and swallowed, and a
    /// failed optimization pass never surfaces to the caller.
    pub async fn record_execution(
        &self,
        template_id: Uuid,
        report: &ExecutionReport,
        sector: &str,
    ) {
        if let Err(e) = self.record_execution_inner(template_id, report, sector).await {
            tracing::warn!("Failed to record prompt execution for {}: {}", template_id, e);
        }
    }

    async fn record_execution_inner(
        &self,
        template_id: Uuid,
        report: &ExecutionReport,
        sector: &str,
    ) -> Result<(), PipelineError> {
        let Some(mut template) = self.store.get(template_id).await? else {
            return Ok(());
        };

        let Some(version) = template.current_mut() else {
            return Ok(());
        };

        let metrics = &mut version.metrics;
        metrics.total_runs += 1;
        if report.success {
            metrics.successful_runs += 1;
            metrics.last_successful_run = Some(Utc::now());
        }
        let n = metrics.total_runs as f64;
        metrics.average_execution_time_ms =
            (metrics.average_execution_time_ms * (n - 1.0) + report.execution_time_ms as f64) / n;
        if let Some(tokens) = report.token_count {
            metrics.token_count = tokens;
        }
        metrics.success_rate = metrics.successful_runs as f64 / metrics.total_runs as f64;

        // Sector override performance, same incremental-average scheme
        if let Some(ovr) = template
            .sector_overrides
            .iter_mut()
            .find(|o| o.sector == sector)
        {
            let perf = &mut ovr.performance;
            perf.sample_size += 1;
            let m = perf.sample_size as f64;
            let success = if report.success { 1.0 } else { 0.0 };
            perf.success_rate = (perf.success_rate * (m - 1.0) + success) / m;
            if let Some(score) = report.score {
                perf.average_score = (perf.average_score * (m - 1.0) + score as f64) / m;
            }
        }

        if self.should_optimize(&template) {
            self.optimize(&mut template);
        }

        self.store.save(&template).await
    }

    fn should_optimize(&self, template: &PromptTemplate) -> bool {
        template
            .current()
            .map(|v| {
                v.metrics.total_runs >= Self::MIN_RUNS_FOR_OPTIMIZATION
                    && v.metrics.success_rate < Self::OPTIMIZATION_THRESHOLD
            })
            .unwrap_or(false)
    }

    /// Clone the current version into a fresh one, reducing verbosity
    /// under token pressure, and deprecate the old version for good.
    fn optimize(&self, template: &mut PromptTemplate) {
        let Some(current) = template.current() else {
            return;
        };

        let mut changes = vec!["version update".to_string()];
        let mut content = current.content.clone();

        let budget = template.parameters.max_tokens as f64;
        if current.metrics.token_count as f64 > budget * Self::TOKEN_PRESSURE_RATIO {
            content = reduce_verbosity(&content);
            changes.push("token optimization".to_string());
        }

        let new_version = PromptVersion::new(format!("v{}", template.versions.len() + 1), content);
        let new_id = new_version.version.clone();

        if let Some(old) = template.current_mut() {
            old.deprecated_at = Some(Utc::now());
        }
        template.versions.push(new_version);
        template.current_version = new_id;
        template.optimization_history.push(OptimizationRecord {
            date: Utc::now(),
            changes,
            impact: 0.0,
        });

        tracing::info!(
            "Optimized prompt template {} -> {}",
            template.id,
            template.current_version
        );
    }
}

/// Apply a sector transform in fixed order: additions, removals,
/// replacements. Removal and replacement patterns are regexes; an
/// invalid pattern degrades to a literal match.
pub fn apply_transform(content: &str, transform: &SectorTransform) -> String {
    let mut result = content.to_string();

    for addition in &transform.additions {
        result.push('\n');
        result.push_str(addition);
    }

    for removal in &transform.removals {
        result = replace_pattern(&result, removal, "");
    }

    for replacement in &transform.replacements {
        result = replace_pattern(&result, &replacement.from, &replacement.to);
    }

    result
}

fn replace_pattern(content: &str, pattern: &str, to: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(content, to).into_owned(),
        Err(_) => content.replace(pattern, to),
    }
}

/// Deterministic verbosity reduction: strip filler and politeness
/// words, unify synonyms, collapse whitespace.
pub fn reduce_verbosity(content: &str) -> String {
    let mut result = content.to_string();
    result = replace_pattern(&result, r"(?i)\b(please|kindly|would you|could you)\b", "");
    result = replace_pattern(&result, r"(?i)\b(ensure|make sure|verify|check)\b", "ensure");
    result = replace_pattern(&result, r"(?i)\b(very|really|extremely|absolutely)\b", "");
    result = replace_pattern(
        &result,
        r"(?i)\b(necessary|needed|required|mandatory)\b",
        "required",
    );
    result = replace_pattern(&result, r"\s+", " ");
    result.trim().to_string()
}
