//! In-memory implementation of PromptStore.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use adgen::domain::{
    PipelineError, PromptKind, PromptTemplate, Replacement, SectorOverride, SectorPerformance,
    SectorTransform,
};
use adgen::ports::PromptStore;

/// In-memory prompt template store
#[derive(Default)]
pub struct MemPromptStore {
    templates: RwLock<HashMap<Uuid, PromptTemplate>>,
}

impl MemPromptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with the default visual and copy templates.
    pub fn seeded() -> Self {
        let mut templates = HashMap::new();

        let mut visual = PromptTemplate::new(
            "visual",
            PromptKind::Image,
            "professional advertising photograph, crisp detail, balanced composition",
        );
        visual.sector_overrides.push(SectorOverride {
            sector: "food".to_string(),
            transform: SectorTransform {
                additions: vec!["appetizing presentation, fresh ingredients".to_string()],
                removals: vec![],
                replacements: vec![Replacement {
                    from: "crisp detail".to_string(),
                    to: "macro texture detail".to_string(),
                }],
            },
            performance: SectorPerformance::default(),
        });
        templates.insert(visual.id, visual);

        let copy = PromptTemplate::new(
            "copy",
            PromptKind::Text,
            "Write a short, punchy advertising caption for the described scene. \
             One sentence, no hashtags.",
        );
        templates.insert(copy.id, copy);

        Self {
            templates: RwLock::new(templates),
        }
    }
}

#[async_trait]
impl PromptStore for MemPromptStore {
    async fn find_active(
        &self,
        category: &str,
        kind: PromptKind,
    ) -> Result<Vec<PromptTemplate>, PipelineError> {
        Ok(self
            .templates
            .read()
            .await
            .values()
            .filter(|t| t.active && t.category == category && t.kind == kind)
            .cloned()
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<PromptTemplate>, PipelineError> {
        Ok(self.templates.read().await.get(&id).cloned())
    }

    async fn save(&self, template: &PromptTemplate) -> Result<(), PipelineError> {
        self.templates
            .write()
            .await
            .insert(template.id, template.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_store_serves_both_kinds() {
        let store = MemPromptStore::seeded();
        let visual = store.find_active("visual", PromptKind::Image).await.unwrap();
        let copy = store.find_active("copy", PromptKind::Text).await.unwrap();
        assert_eq!(visual.len(), 1);
        assert_eq!(copy.len(), 1);
    }
}
