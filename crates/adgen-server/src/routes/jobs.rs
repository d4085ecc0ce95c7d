//! Job routes - trigger and track generation jobs.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::models::{CreateJobRequest, CreateJobResponse, JobItemsResponse, JobStatusResponse};
use crate::AppState;

/// Trigger a generation job. Returns immediately; progress is tracked
/// through the status and items routes.
pub async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<Json<CreateJobResponse>, (StatusCode, String)> {
    if request.items.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "a job needs at least one item".to_string(),
        ));
    }

    let (job_id, item_ids) = state.generation.create_job(&request).await;

    let service = state.generation.clone();
    let spawned_id = job_id.clone();
    tokio::spawn(async move {
        service.run_job(spawned_id, request, item_ids).await;
    });

    Ok(Json(CreateJobResponse { job_id }))
}

/// Fast-path status report
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, (StatusCode, String)> {
    match state.jobs.status(&job_id).await {
        Some(report) => Ok(Json(JobStatusResponse { report })),
        None => Err((StatusCode::NOT_FOUND, format!("no job {}", job_id))),
    }
}

/// Fallback raw item listing
pub async fn job_items(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobItemsResponse>, (StatusCode, String)> {
    match state.jobs.items(&job_id).await {
        Some(items) => Ok(Json(JobItemsResponse { items })),
        None => Err((StatusCode::NOT_FOUND, format!("no job {}", job_id))),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/adgen/jobs", post(create_job))
        .route("/adgen/jobs/:id/status", get(job_status))
        .route("/adgen/jobs/:id/items", get(job_items))
}
