// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runner: end-to-end orchestration of one job run.
//!
//! Loads the job, advances it through the forward lifecycle, walks the
//! plan delegating tool steps to the bounded executor, collects results
//! into artifacts and signals, and finalizes the terminal state from the
//! verification verdict. Errors are not caught here — the boundary
//! handler drives the job to FAILED and emits the ERROR audit.

use docops_core::{
    artifact, signal_keys, tool_names, AuditEventType, JobId, JobStatus, PlanError, Signals,
    StepKind, ToolPolicy, Verdict,
};
use docops_storage::Store;
use docops_tools::{ToolCtx, ToolRegistry};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::EngineError;
use crate::executor::{BoundedExecutor, ExecLimits, ExecState};
use crate::planner::build_plan;
use crate::service::advance_status;

/// Statuses that short-circuit a run as a no-op.
///
/// CANCELLED is terminal like the rest; a cancelled job re-run is a
/// no-op rather than an error.
const NOOP_STATUSES: [JobStatus; 4] =
    [JobStatus::Succeeded, JobStatus::Failed, JobStatus::NeedsReview, JobStatus::Cancelled];

/// Result payload of one `run_job` call.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub job_id: JobId,
    pub final_status: JobStatus,
    pub signals: Signals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Run a job under the default policy.
pub async fn run_job(
    store: &dyn Store,
    job_id: &JobId,
    tools: &ToolRegistry,
) -> Result<RunOutcome, EngineError> {
    run_job_with_policy(store, job_id, tools, &ToolPolicy::default_policy()).await
}

/// Run a job under an explicit policy.
pub async fn run_job_with_policy(
    store: &dyn Store,
    job_id: &JobId,
    tools: &ToolRegistry,
    policy: &ToolPolicy,
) -> Result<RunOutcome, EngineError> {
    // --- Phase A: preconditions & idempotency ---
    let mut job = store.job(job_id).await?.ok_or(EngineError::JobNotFound(*job_id))?;

    if NOOP_STATUSES.contains(&job.status) {
        tracing::info!(job_id = %job_id, status = %job.status, "run is a no-op, job terminal");
        return Ok(RunOutcome {
            job_id: *job_id,
            final_status: job.status,
            signals: job.signals,
            note: Some(format!("no-op: job already terminal ({})", job.status)),
        });
    }

    if !job.has_source_text() {
        return Err(EngineError::MissingSource(*job_id));
    }
    let source_text = job.source_text.clone().unwrap_or_default();

    // --- Phase B: prep & route ---
    advance_status(store, &mut job, JobStatus::Preprocessed, "preprocess_done").await?;

    let (plan, routing) = build_plan(job_id, &source_text)?;

    job.domain = Some(routing.domain.clone());
    job.pipeline_id = Some(routing.pipeline_id.clone());
    job.schema_id = Some(routing.schema_id.clone());
    job = store.update_job(&job).await?;
    job = store.merge_signals(job_id, &routing.as_signals()).await?;

    advance_status(store, &mut job, JobStatus::Routed, "routed").await?;
    advance_status(store, &mut job, JobStatus::Planned, "plan_built").await?;
    advance_status(store, &mut job, JobStatus::Executing, "execution_started").await?;

    // --- Phase C: plan walk ---
    let executor = BoundedExecutor::new(ExecLimits::from(plan.limits()));
    let mut state = ExecState::default();
    let mut signals = job.signals.clone();
    let mut extracted: Option<Value> = None;
    let mut verification_report: Option<Value> = None;

    for step in plan.steps() {
        let matched = step.gate_matches(&signals);

        if step.kind == StepKind::Halt {
            if matched {
                let reason = step.reason.as_deref().unwrap_or_default();
                store
                    .append_event(job_id, AuditEventType::ExecutorHalted, json!({ "reason": reason }))
                    .await?;
                tracing::info!(job_id = %job_id, step = %step.id, reason, "executor halted");
                break;
            }
            continue;
        }
        if !matched {
            continue;
        }

        let tool_name = step
            .tool
            .as_deref()
            .ok_or_else(|| PlanError::MissingTool { step: step.id.clone(), kind: step.kind })?;
        let tool = tools
            .get(tool_name)
            .ok_or_else(|| EngineError::ToolNotRegistered(tool_name.to_string()))?;

        // Runner-owned bindings layered over the plan's static inputs.
        let mut inputs = step.inputs.clone();
        match step.kind {
            StepKind::Extract => {
                inputs.insert("source_text".to_string(), json!(source_text));
            }
            StepKind::Verify => {
                inputs.insert("source_text".to_string(), json!(source_text));
                inputs.insert(
                    "extracted".to_string(),
                    extracted.clone().unwrap_or_else(|| json!({})),
                );
            }
            StepKind::Action | StepKind::Halt => {}
        }
        match tool_name {
            tool_names::ACTIONS_EXPORT_JSON | tool_names::ACTIONS_DRAFT_EMAIL => {
                inputs.insert(
                    "extracted".to_string(),
                    extracted.clone().unwrap_or_else(|| json!({})),
                );
            }
            tool_names::ACTIONS_CREATE_TICKET => {
                inputs.insert(
                    "report".to_string(),
                    verification_report.clone().unwrap_or_else(|| json!({})),
                );
            }
            _ => {}
        }

        let ctx = ToolCtx::new(*job_id, routing.domain.clone()).signals(signals.clone());
        let result = executor
            .run_tool(store, job_id, tool_name, tool.as_ref(), &inputs, &ctx, &mut state, policy)
            .await?;

        match step.kind {
            StepKind::Extract => {
                let payload = result.get("extracted").cloned().unwrap_or_else(|| json!({}));
                store.append_artifact(job_id, artifact::names::EXTRACTED_JSON, payload.clone()).await?;
                extracted = Some(payload);
                signals.set(signal_keys::EXTRACTION_OK, json!(true));
            }
            StepKind::Verify => {
                let report = result.get("report").cloned().unwrap_or_else(|| json!({}));
                store
                    .append_artifact(job_id, artifact::names::VERIFICATION_REPORT, report.clone())
                    .await?;
                let verdict = report.get("verdict").cloned().unwrap_or(Value::Null);
                signals.set(signal_keys::VERIFICATION_VERDICT, verdict);
                verification_report = Some(report);
            }
            StepKind::Action => {
                let payload = Value::Object(result.clone().into_iter().collect());
                let name = match tool_name {
                    tool_names::ACTIONS_EXPORT_JSON => Some(artifact::names::EXPORT_RESULT),
                    tool_names::ACTIONS_DRAFT_EMAIL => Some(artifact::names::EMAIL_DRAFT),
                    tool_names::ACTIONS_CREATE_TICKET => Some(artifact::names::TICKET),
                    _ => None,
                };
                if let Some(name) = name {
                    store.append_artifact(job_id, name, payload).await?;
                }
            }
            StepKind::Halt => {}
        }
    }

    // --- Phase D: finalization ---
    let mut job = store.merge_signals(job_id, &signals).await?;
    let verdict = Verdict::from_signal(job.signals.get(signal_keys::VERIFICATION_VERDICT));

    advance_status(store, &mut job, JobStatus::Verified, "verification_completed").await?;

    match verdict {
        Some(Verdict::Pass) => {
            advance_status(store, &mut job, JobStatus::Acted, "actions_completed").await?;
            advance_status(store, &mut job, JobStatus::Succeeded, "done").await?;
        }
        Some(Verdict::Warn) => {
            advance_status(store, &mut job, JobStatus::Acted, "actions_completed_warn").await?;
            advance_status(store, &mut job, JobStatus::NeedsReview, "needs_human_review").await?;
        }
        Some(Verdict::Fail) => {
            advance_status(store, &mut job, JobStatus::Acted, "actions_completed_fail").await?;
            advance_status(store, &mut job, JobStatus::Failed, "verification_failed").await?;
        }
        None => {
            // Lenient fallback: no verify step ran or the verdict was
            // never set. The state machine still requires the ACTED hop.
            advance_status(store, &mut job, JobStatus::Acted, "actions_completed").await?;
            advance_status(store, &mut job, JobStatus::Succeeded, "done_no_verdict").await?;
        }
    }

    let job = store.job(job_id).await?.ok_or(EngineError::JobNotFound(*job_id))?;
    tracing::info!(job_id = %job_id, final_status = %job.status, "run completed");
    Ok(RunOutcome { job_id: *job_id, final_status: job.status, signals: job.signals, note: None })
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
