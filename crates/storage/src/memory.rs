// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory store for deterministic tests.
//!
//! Same append-only discipline as the SQLite backend: event and artifact
//! ids come from one monotone counter each, and nothing is ever mutated
//! after insert.

use async_trait::async_trait;
use chrono::Utc;
use docops_core::{Artifact, AuditEvent, AuditEventType, Job, JobId, Signals};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;

use crate::store::{Store, StoreError};

#[derive(Default)]
struct Inner {
    jobs: HashMap<JobId, Job>,
    events: Vec<AuditEvent>,
    artifacts: Vec<Artifact>,
    next_event_id: i64,
    next_artifact_id: i64,
}

/// Map-backed [`Store`].
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_job(&self, job: &Job) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        if inner.jobs.contains_key(&job.id) {
            return Err(StoreError::JobExists(job.id));
        }
        inner.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.inner.lock().jobs.get(id).cloned())
    }

    async fn update_job(&self, job: &Job) -> Result<Job, StoreError> {
        let mut inner = self.inner.lock();
        let row = inner.jobs.get_mut(&job.id).ok_or(StoreError::MissingJob(job.id))?;
        let mut updated = job.clone();
        // Ingest metadata is immutable after create.
        updated.filename = row.filename.clone();
        updated.content_type = row.content_type.clone();
        updated.created_at = row.created_at;
        updated.updated_at = Utc::now();
        *row = updated.clone();
        Ok(updated)
    }

    async fn merge_signals(&self, id: &JobId, new_signals: &Signals) -> Result<Job, StoreError> {
        let mut inner = self.inner.lock();
        let row = inner.jobs.get_mut(id).ok_or(StoreError::MissingJob(*id))?;
        row.signals.merge(new_signals);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn append_event(
        &self,
        id: &JobId,
        event_type: AuditEventType,
        payload: Value,
    ) -> Result<AuditEvent, StoreError> {
        let mut inner = self.inner.lock();
        inner.next_event_id += 1;
        let event = AuditEvent {
            id: inner.next_event_id,
            job_id: *id,
            event_type,
            payload,
            created_at: Utc::now(),
        };
        inner.events.push(event.clone());
        Ok(event)
    }

    async fn events(&self, id: &JobId) -> Result<Vec<AuditEvent>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.events.iter().filter(|e| &e.job_id == id).cloned().collect())
    }

    async fn append_artifact(
        &self,
        id: &JobId,
        name: &str,
        payload: Value,
    ) -> Result<Artifact, StoreError> {
        let mut inner = self.inner.lock();
        inner.next_artifact_id += 1;
        let artifact = Artifact {
            id: inner.next_artifact_id,
            job_id: *id,
            name: name.to_string(),
            payload,
            created_at: Utc::now(),
        };
        inner.artifacts.push(artifact.clone());
        Ok(artifact)
    }

    async fn artifacts(&self, id: &JobId) -> Result<Vec<Artifact>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.artifacts.iter().filter(|a| &a.job_id == id).cloned().collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
