//! Generation use case: runs one job end to end.
//!
//! For each requested item the text collaborator first drafts a scene
//! description from the creative context, then the orchestrator runs
//! its generate-validate-retry loop on that scene. A failed text step
//! degrades to the registry's visual template; a failed item marks the
//! whole job as errored.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use adgen::domain::{GenerationContext, PromptKind};
use adgen::ports::{TextGenerator, TextMessage, TextRequest};
use adgen::services::{ExecutionReport, GenerationOrchestrator, GenerationSpec, PromptRegistry};

use crate::application::JobTracker;
use crate::models::{CreateJobRequest, JobItemRequest};

/// Application service driving generation jobs
pub struct GenerationService {
    orchestrator: GenerationOrchestrator,
    registry: PromptRegistry,
    text: Arc<dyn TextGenerator>,
    tracker: Arc<JobTracker>,
}

impl GenerationService {
    pub fn new(
        orchestrator: GenerationOrchestrator,
        registry: PromptRegistry,
        text: Arc<dyn TextGenerator>,
        tracker: Arc<JobTracker>,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            text,
            tracker,
        }
    }

    /// Register a job and return the ids the routes will track it by.
    pub async fn create_job(&self, request: &CreateJobRequest) -> (String, Vec<String>) {
        let job_id = Uuid::new_v4().to_string();
        let item_ids: Vec<String> = request
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| item.id.clone().unwrap_or_else(|| format!("item-{}", i + 1)))
            .collect();
        let requires_video: Vec<bool> = request.items.iter().map(|i| i.requires_video).collect();

        self.tracker.create(&job_id, &item_ids, &requires_video).await;
        (job_id, item_ids)
    }

    /// Run the whole job. Intended to be spawned; progress is visible
    /// through the tracker while this runs.
    pub async fn run_job(&self, job_id: String, request: CreateJobRequest, item_ids: Vec<String>) {
        tracing::info!("🚀 Job {} started with {} items", job_id, request.items.len());

        for (item, item_id) in request.items.iter().zip(&item_ids) {
            let context = item.context();
            let scene = self.draft_scene(item, &context).await;

            let mut spec = GenerationSpec::new(format!("{}-{}", job_id, item_id), context);
            spec.base_prompt = scene;
            spec.skip_cache = request.skip_cache;

            match self.orchestrator.generate(&spec).await {
                Ok(result) => {
                    tracing::info!(
                        "Job {} item {} accepted (score {}, {} attempts{})",
                        job_id,
                        item_id,
                        result.score,
                        result.attempts_used,
                        if result.from_cache { ", cached" } else { "" }
                    );
                    self.tracker
                        .set_item_image(&job_id, item_id, result.artifact.to_string())
                        .await;
                }
                Err(e) => {
                    tracing::error!("Job {} item {} failed: {}", job_id, item_id, e);
                    self.tracker.mark_error(&job_id, e.to_string()).await;
                    return;
                }
            }
        }

        self.tracker.mark_completed(&job_id).await;
        tracing::info!("✅ Job {} completed", job_id);
    }

    /// Draft the scene description through the text collaborator,
    /// guided by the copy template. Falls back to the caller's prompt
    /// (or nothing, letting the visual template stand in) on failure.
    /// Every model call is reported back into the template's metrics.
    async fn draft_scene(
        &self,
        item: &JobItemRequest,
        context: &GenerationContext,
    ) -> Option<String> {
        let template = match self
            .registry
            .get_optimized_prompt("copy", PromptKind::Text, &context.sector, context)
            .await
        {
            Ok(Some(t)) => t,
            Ok(None) => return item.prompt.clone(),
            Err(e) => {
                tracing::warn!("Copy template lookup failed: {}", e);
                return item.prompt.clone();
            }
        };

        let system = match template.current() {
            Some(version) => version.content.clone(),
            None => return item.prompt.clone(),
        };
        let brief = format!(
            "Purpose: {}. Sector: {}. Scene idea: {}",
            context.purpose.as_str(),
            context.sector,
            item.prompt.as_deref().unwrap_or("none provided")
        );

        let request = TextRequest {
            messages: vec![TextMessage::system(system), TextMessage::user(brief)],
            max_tokens: template.parameters.max_tokens,
            temperature: template.parameters.temperature,
            frequency_penalty: template.parameters.frequency_penalty,
            presence_penalty: template.parameters.presence_penalty,
        };

        let started = Instant::now();
        match self.text.generate_text(&request).await {
            Ok(response) => {
                self.registry
                    .record_execution(
                        template.id,
                        &ExecutionReport {
                            success: true,
                            execution_time_ms: started.elapsed().as_millis() as u64,
                            token_count: Some(response.token_count),
                            score: None,
                        },
                        &context.sector,
                    )
                    .await;
                Some(response.content.trim().to_string())
            }
            Err(e) => {
                tracing::warn!("Scene drafting failed, using raw prompt: {}", e);
                self.registry
                    .record_execution(
                        template.id,
                        &ExecutionReport {
                            success: false,
                            execution_time_ms: started.elapsed().as_millis() as u64,
                            token_count: None,
                            score: None,
                        },
                        &context.sector,
                    )
                    .await;
                item.prompt.clone()
            }
        }
    }
}
