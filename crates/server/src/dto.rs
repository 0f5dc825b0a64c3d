// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DTO structs for the jobs resource.

use chrono::{DateTime, Utc};
use docops_core::{Artifact, AuditEvent, AuditEventType, Job, JobId, JobStatus, Signals};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct JobCreateRequest {
    pub filename: String,
    pub content_type: String,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobResponse {
    pub id: JobId,
    pub status: JobStatus,
    pub filename: String,
    pub content_type: String,
    pub domain: Option<String>,
    pub pipeline_id: Option<String>,
    pub schema_id: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub signals: Signals,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
            filename: job.filename,
            content_type: job.content_type,
            domain: job.domain,
            pipeline_id: job.pipeline_id,
            schema_id: job.schema_id,
            error: job.error,
            signals: job.signals,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusUpdateRequest {
    pub to_status: JobStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEventResponse {
    pub id: i64,
    pub job_id: JobId,
    pub event_type: AuditEventType,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEvent> for AuditEventResponse {
    fn from(event: AuditEvent) -> Self {
        Self {
            id: event.id,
            job_id: event.job_id,
            event_type: event.event_type,
            payload: event.payload,
            created_at: event.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactResponse {
    pub id: i64,
    pub job_id: JobId,
    pub name: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

impl From<Artifact> for ArtifactResponse {
    fn from(artifact: Artifact) -> Self {
        Self {
            id: artifact.id,
            job_id: artifact.job_id,
            name: artifact.name,
            payload: artifact.payload,
            created_at: artifact.created_at,
        }
    }
}
