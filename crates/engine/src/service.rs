// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job service: the only sanctioned path for status mutation.

use docops_core::{ensure_transition_allowed, AuditEventType, Job, JobId, JobStatus};
use docops_storage::Store;
use serde_json::json;

use crate::error::EngineError;

/// Validate, persist, and audit a status change.
///
/// Emits a STATUS_CHANGED event with `{from, to, reason}` after the row
/// is updated; a failed audit write fails the whole operation.
pub async fn set_job_status(
    store: &dyn Store,
    job_id: &JobId,
    to: JobStatus,
    reason: Option<&str>,
) -> Result<Job, EngineError> {
    let mut job = store.job(job_id).await?.ok_or(EngineError::JobNotFound(*job_id))?;
    let from = job.status;
    ensure_transition_allowed(from, to)?;

    job.status = to;
    let job = store.update_job(&job).await?;

    store
        .append_event(
            job_id,
            AuditEventType::StatusChanged,
            json!({ "from": from.to_string(), "to": to.to_string(), "reason": reason }),
        )
        .await?;
    tracing::info!(job_id = %job_id, from = %from, to = %to, reason, "job status changed");

    Ok(job)
}

/// Rank-monotone status advance: a no-op when the job is already at or
/// past `to`. This is what makes re-running a job idempotent — forward
/// progress only, never regression.
pub async fn advance_status(
    store: &dyn Store,
    job: &mut Job,
    to: JobStatus,
    reason: &str,
) -> Result<(), EngineError> {
    if job.status == to || job.status.rank() >= to.rank() {
        return Ok(());
    }
    *job = set_job_status(store, &job.id, to, Some(reason)).await?;
    Ok(())
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
