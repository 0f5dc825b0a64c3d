// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Store` trait: one job-scoped transactional session surface.

use async_trait::async_trait;
use docops_core::{Artifact, AuditEvent, AuditEventType, Job, JobId, Signals};
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job already exists: {0}")]
    JobExists(JobId),
    #[error("job not found: {0}")]
    MissingJob(JobId),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json encoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Transactional store for jobs, audit events, and artifacts.
///
/// One run of a job owns one store handle for its duration; the runner is
/// the only writer for that job while it runs. Audit and artifact writes
/// are append-only: rows are never updated or deleted, and readers order
/// by id. Audit writes are not best-effort — a failed append fails the
/// calling operation.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a freshly received job row.
    async fn create_job(&self, job: &Job) -> Result<(), StoreError>;

    /// Load a job by id.
    async fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError>;

    /// Persist the mutable columns of a job and bump `updated_at`.
    /// Returns the refreshed row.
    async fn update_job(&self, job: &Job) -> Result<Job, StoreError>;

    /// Shallow-merge signals onto the job row (later writes win) and
    /// return the refreshed row.
    async fn merge_signals(&self, id: &JobId, new_signals: &Signals) -> Result<Job, StoreError>;

    /// Append one audit event. Ids are store-assigned and monotone.
    async fn append_event(
        &self,
        id: &JobId,
        event_type: AuditEventType,
        payload: Value,
    ) -> Result<AuditEvent, StoreError>;

    /// All audit events for a job, ordered by id.
    async fn events(&self, id: &JobId) -> Result<Vec<AuditEvent>, StoreError>;

    /// Append one artifact row. Repeated names are permitted; readers
    /// take the latest by id.
    async fn append_artifact(
        &self,
        id: &JobId,
        name: &str,
        payload: Value,
    ) -> Result<Artifact, StoreError>;

    /// All artifacts for a job, ordered by id.
    async fn artifacts(&self, id: &JobId) -> Result<Vec<Artifact>, StoreError>;
}
