//! Criterion scoring through the text collaborator.
//!
//! Each criterion is scored by asking the text model for a strict JSON
//! verdict about the artifact. An unparseable or out-of-range answer
//! is treated as a missing signal, which the validator fills with the
//! criterion's neutral default.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use adgen::domain::{ArtifactRef, GenerationContext};
use adgen::ports::{
    Criterion, CriterionScorer, ScorerError, ScorerSignal, TextGenerator, TextMessage, TextRequest,
};

/// Scorer backed by the text collaborator
pub struct TextScorer {
    generator: Arc<dyn TextGenerator>,
}

impl TextScorer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[derive(Deserialize)]
struct Verdict {
    score: u8,
    #[serde(default)]
    technical_issues: Vec<String>,
    #[serde(default)]
    style_issues: Vec<String>,
    #[serde(default)]
    sector_issues: Vec<String>,
}

#[async_trait]
impl CriterionScorer for TextScorer {
    async fn evaluate(
        &self,
        criterion: Criterion,
        artifact: &ArtifactRef,
        context: &GenerationContext,
    ) -> Result<ScorerSignal, ScorerError> {
        let request = TextRequest {
            messages: vec![
                TextMessage::system(
                    "You are an advertising image quality judge. \
                     Answer with strict JSON only: \
                     {\"score\": 0-100, \"technical_issues\": [], \
                     \"style_issues\": [], \"sector_issues\": []}",
                ),
                TextMessage::user(format!(
                    "Criterion: {}. Sector: {}. Purpose: {}. Image: {}",
                    criterion.name(),
                    context.sector,
                    context.purpose.as_str(),
                    artifact
                )),
            ],
            max_tokens: 256,
            temperature: 0.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        let response = self.generator.generate_text(&request).await.map_err(|e| {
            if e.is_transient() {
                ScorerError::Transient(e.to_string())
            } else {
                ScorerError::Unavailable
            }
        })?;

        match serde_json::from_str::<Verdict>(response.content.trim()) {
            Ok(v) if v.score <= 100 => Ok(ScorerSignal {
                score: Some(v.score),
                technical_issues: v.technical_issues,
                style_issues: v.style_issues,
                sector_issues: v.sector_issues,
            }),
            Ok(v) => {
                tracing::warn!("Out-of-range {} score {}", criterion.name(), v.score);
                Err(ScorerError::Unavailable)
            }
            Err(e) => {
                tracing::warn!("Unparseable {} verdict: {}", criterion.name(), e);
                Err(ScorerError::Unavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgen::domain::{PipelineError, Purpose};
    use adgen::ports::TextResponse;

    struct CannedText(String);

    #[async_trait]
    impl TextGenerator for CannedText {
        async fn generate_text(
            &self,
            _request: &TextRequest,
        ) -> Result<TextResponse, PipelineError> {
            Ok(TextResponse {
                content: self.0.clone(),
                token_count: 10,
            })
        }
    }

    fn context() -> GenerationContext {
        GenerationContext::new(Purpose::Social, "food")
    }

    #[tokio::test]
    async fn test_parses_strict_json_verdict() {
        let scorer = TextScorer::new(Arc::new(CannedText(
            r#"{"score": 87, "technical_issues": ["slight noise"]}"#.to_string(),
        )));
        let signal = scorer
            .evaluate(
                Criterion::Sharpness,
                &ArtifactRef::new("https://cdn.example/a.png"),
                &context(),
            )
            .await
            .unwrap();
        assert_eq!(signal.score, Some(87));
        assert_eq!(signal.technical_issues, vec!["slight noise".to_string()]);
    }

    #[tokio::test]
    async fn test_garbage_is_missing_signal() {
        let scorer = TextScorer::new(Arc::new(CannedText("not json at all".to_string())));
        let err = scorer
            .evaluate(
                Criterion::Color,
                &ArtifactRef::new("https://cdn.example/a.png"),
                &context(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ScorerError::Unavailable));
    }
}
