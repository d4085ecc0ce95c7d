use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

mod adapters;
mod application;
mod config;
mod models;
mod routes;

use adapters::{HttpImageGenerator, HttpTextGenerator, MemCacheStore, MemPromptStore, MemSessionStore, TextScorer};
use adgen::ports::TextGenerator;
use adgen::services::{
    ArtifactCache, GenerationOrchestrator, PromptRegistry, QualityValidator, SessionTracker,
};
use application::{GenerationService, JobTracker};
use config::ServerConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub generation: Arc<GenerationService>,
    pub jobs: Arc<JobTracker>,
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Adgen API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adgen_server=info,adgen=info".into()),
        )
        .init();

    tracing::info!("🎨 Adgen API initializing...");

    let config = ServerConfig::from_env()?;

    // Stores (in-memory backend)
    let prompt_store = Arc::new(MemPromptStore::seeded());
    let session_store = Arc::new(MemSessionStore::new());
    let cache_store = Arc::new(MemCacheStore::new());

    // External collaborators
    let text: Arc<dyn TextGenerator> =
        Arc::new(HttpTextGenerator::new(config.text_api_url.clone(), config.text_api_key.clone()));
    let image = Arc::new(HttpImageGenerator::new(
        config.image_api_url.clone(),
        config.image_api_key.clone(),
    ));
    let scorer = Arc::new(TextScorer::new(text.clone()));

    // Pipeline
    let orchestrator = GenerationOrchestrator::new(
        PromptRegistry::new(prompt_store.clone()),
        QualityValidator::new(scorer),
        ArtifactCache::new(cache_store),
        SessionTracker::new(session_store),
        image,
    );

    let tracker = Arc::new(JobTracker::new());
    let generation = Arc::new(GenerationService::new(
        orchestrator,
        PromptRegistry::new(prompt_store),
        text,
        tracker.clone(),
    ));

    let state = AppState {
        generation,
        jobs: tracker,
    };

    let app = Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .merge(routes::jobs::router())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🚀 Adgen API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
