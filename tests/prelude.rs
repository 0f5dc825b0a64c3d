//! Shared helpers for scenario specs.

use docops_core::{AuditEvent, AuditEventType, Job, JobIntake, SystemClock};
use docops_storage::{MemoryStore, Store};
use docops_tools::{
    CreateTicketTool, DraftEmailTool, ExportJsonTool, ScriptedTool, StubExtractionTool,
    ToolRegistry, VerificationTool,
};
use serde_json::json;
use std::sync::Arc;

/// Stub extraction (non-empty fields) + deterministic verifier + action
/// stubs: the PASS pipeline.
pub fn passing_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(StubExtractionTool::new()));
    registry.register(Arc::new(VerificationTool));
    registry.register(Arc::new(ExportJsonTool));
    registry.register(Arc::new(DraftEmailTool));
    registry.register(Arc::new(CreateTicketTool));
    registry
}

/// Extraction that produces an empty fields map, which the real verifier
/// hard-fails.
pub fn failing_registry() -> ToolRegistry {
    let mut registry = passing_registry();
    registry.register(Arc::new(StubExtractionTool::empty_fields()));
    registry
}

/// Verifier scripted to a fixed verdict.
pub fn registry_with_verdict(verdict: &str) -> ToolRegistry {
    let mut registry = passing_registry();
    registry.register(Arc::new(ScriptedTool::verifier(verdict)));
    registry
}

/// Create a job the way the boundary does: insert the row and append the
/// JOB_CREATED audit.
pub async fn create_job(store: &MemoryStore, text: Option<&str>) -> Job {
    let mut intake = JobIntake::new("doc.txt", "text/plain");
    if let Some(text) = text {
        intake = intake.source_text(text);
    }
    let job = Job::new(intake, &SystemClock);

    store.create_job(&job).await.unwrap();
    store
        .append_event(
            &job.id,
            AuditEventType::JobCreated,
            json!({
                "filename": job.filename,
                "content_type": job.content_type,
                "has_text": text.is_some(),
            }),
        )
        .await
        .unwrap();
    job
}

/// Render an audit trail as compact `TYPE(detail)` strings for timeline
/// assertions.
pub fn timeline(events: &[AuditEvent]) -> Vec<String> {
    events
        .iter()
        .map(|event| match event.event_type {
            AuditEventType::StatusChanged => format!(
                "STATUS_CHANGED({}->{})",
                event.payload["from"].as_str().unwrap_or("?"),
                event.payload["to"].as_str().unwrap_or("?"),
            ),
            AuditEventType::ToolCalled => format!(
                "TOOL_CALLED({})",
                event.payload["tool"].as_str().unwrap_or("?")
            ),
            AuditEventType::ToolResult => format!(
                "TOOL_RESULT({})",
                event.payload["tool"].as_str().unwrap_or("?")
            ),
            other => other.to_string(),
        })
        .collect()
}

/// Names of the job's artifacts in append order.
pub async fn artifact_names(store: &MemoryStore, job: &Job) -> Vec<String> {
    store
        .artifacts(&job.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect()
}
