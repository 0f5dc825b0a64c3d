// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for the jobs resource.
//!
//! This is the boundary of the core: run failures are caught here, the
//! job is driven to FAILED, the ERROR audit is appended, and the error is
//! translated to a status code. Cleanup failures are logged, never
//! allowed to mask the original error.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use docops_core::{AuditEventType, Job, JobId, JobIntake, JobStatus};
use docops_engine::{run_job_with_policy, set_job_status, EngineError, RunOutcome};
use docops_storage::Store;
use serde_json::json;

use crate::config::SERVICE_VERSION;
use crate::dto::{
    ArtifactResponse, AuditEventResponse, JobCreateRequest, JobResponse, JobStatusUpdateRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/jobs", post(create_job))
        .route("/jobs/{job_id}", get(get_job))
        .route("/jobs/{job_id}/events", get(get_job_events))
        .route("/jobs/{job_id}/artifacts", get(get_job_artifacts))
        .route("/jobs/{job_id}/status", post(update_job_status))
        .route("/jobs/{job_id}/run", post(run_job))
        .with_state(state)
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "service": "docops", "version": SERVICE_VERSION }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn ready() -> Json<serde_json::Value> {
    Json(json!({ "ready": true }))
}

pub(crate) async fn create_job(
    State(state): State<AppState>,
    Json(req): Json<JobCreateRequest>,
) -> Result<(StatusCode, Json<JobResponse>), ApiError> {
    let has_text = req.text.as_deref().is_some_and(|t| !t.is_empty());
    let mut intake = JobIntake::new(req.filename, req.content_type);
    if let Some(text) = req.text {
        intake = intake.source_text(text);
    }
    let job = Job::new(intake, &state.clock);

    state.store.create_job(&job).await?;
    state
        .store
        .append_event(
            &job.id,
            AuditEventType::JobCreated,
            json!({
                "filename": job.filename,
                "content_type": job.content_type,
                "has_text": has_text,
            }),
        )
        .await?;
    tracing::info!(job_id = %job.id, filename = %job.filename, "job created");

    Ok((StatusCode::CREATED, Json(job.into())))
}

pub(crate) async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    let job = load_job(&state, &job_id).await?;
    Ok(Json(job.into()))
}

pub(crate) async fn get_job_events(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<AuditEventResponse>>, ApiError> {
    let job = load_job(&state, &job_id).await?;
    let events = state.store.events(&job.id).await?;
    Ok(Json(events.into_iter().map(AuditEventResponse::from).collect()))
}

pub(crate) async fn get_job_artifacts(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<ArtifactResponse>>, ApiError> {
    let job = load_job(&state, &job_id).await?;
    let artifacts = state.store.artifacts(&job.id).await?;
    Ok(Json(artifacts.into_iter().map(ArtifactResponse::from).collect()))
}

pub(crate) async fn update_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(req): Json<JobStatusUpdateRequest>,
) -> Result<Json<JobResponse>, ApiError> {
    let job_id = parse_job_id(&job_id)?;
    let job = set_job_status(state.store.as_ref(), &job_id, req.to_status, req.reason.as_deref())
        .await
        .map_err(|err| match err {
            EngineError::JobNotFound(_) => ApiError::NotFound("job not found".to_string()),
            EngineError::InvalidTransition(e) => ApiError::BadRequest(e.to_string()),
            other => ApiError::Internal(other.to_string()),
        })?;
    Ok(Json(job.into()))
}

pub(crate) async fn run_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<RunOutcome>, ApiError> {
    let job_id = parse_job_id(&job_id)?;
    match run_job_with_policy(
        state.store.as_ref(),
        &job_id,
        state.tools.as_ref(),
        state.policy.as_ref(),
    )
    .await
    {
        Ok(outcome) => Ok(Json(outcome)),
        Err(err) => Err(handle_run_failure(&state, &job_id, err).await),
    }
}

/// Boundary failure handling: drive the job to FAILED, append the ERROR
/// audit, and translate to a status code. Precondition failures
/// (missing job, missing source) translate directly without touching the
/// job.
async fn handle_run_failure(state: &AppState, job_id: &JobId, err: EngineError) -> ApiError {
    match err {
        EngineError::JobNotFound(_) => ApiError::NotFound("job not found".to_string()),
        EngineError::MissingSource(_) => ApiError::BadRequest("job has no source_text".to_string()),
        EngineError::PolicyDenied(_) => {
            fail_job(state, job_id, &err, "policy_denied").await;
            ApiError::Forbidden(err.to_string())
        }
        other => {
            fail_job(state, job_id, &other, "run_failed").await;
            ApiError::Internal(other.to_string())
        }
    }
}

/// Drive the job to FAILED and append the ERROR audit. Failures here are
/// logged but never mask the original error.
async fn fail_job(state: &AppState, job_id: &JobId, err: &EngineError, kind: &str) {
    tracing::error!(job_id = %job_id, error = %err, kind, "run failed");

    if let Err(cleanup) =
        set_job_status(state.store.as_ref(), job_id, JobStatus::Failed, Some(kind)).await
    {
        tracing::warn!(job_id = %job_id, error = %cleanup, "failed to drive job to FAILED");
    }
    if let Err(cleanup) = state
        .store
        .append_event(
            job_id,
            AuditEventType::Error,
            json!({ "error": err.to_string(), "kind": kind }),
        )
        .await
    {
        tracing::warn!(job_id = %job_id, error = %cleanup, "failed to append ERROR audit");
    }
}

/// Parse a path id. Anything longer than a canonical UUID cannot name a
/// job, so it maps to 404 rather than reaching the id buffer.
fn parse_job_id(job_id: &str) -> Result<JobId, ApiError> {
    if job_id.len() > docops_core::id::ID_MAX_LEN {
        return Err(ApiError::NotFound("job not found".to_string()));
    }
    Ok(JobId::from_string(job_id))
}

async fn load_job(state: &AppState, job_id: &str) -> Result<Job, ApiError> {
    state
        .store
        .job(&parse_job_id(job_id)?)
        .await?
        .ok_or_else(|| ApiError::NotFound("job not found".to_string()))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
