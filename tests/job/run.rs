//! Verdict-driven run scenarios: PASS, FAIL, WARN.

use crate::prelude::*;
use docops_core::JobStatus;
use docops_engine::run_job;
use docops_storage::{MemoryStore, Store};
use serde_json::json;

#[tokio::test]
async fn happy_path_timeline_and_artifacts() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;

    let outcome = run_job(&store, &job.id, &passing_registry()).await.unwrap();
    assert_eq!(outcome.final_status, JobStatus::Succeeded);

    let events = store.events(&job.id).await.unwrap();
    assert_eq!(
        timeline(&events),
        [
            "JOB_CREATED",
            "STATUS_CHANGED(RECEIVED->PREPROCESSED)",
            "STATUS_CHANGED(PREPROCESSED->ROUTED)",
            "STATUS_CHANGED(ROUTED->PLANNED)",
            "STATUS_CHANGED(PLANNED->EXECUTING)",
            "TOOL_CALLED(extraction.run)",
            "TOOL_RESULT(extraction.run)",
            "TOOL_CALLED(verification.run)",
            "TOOL_RESULT(verification.run)",
            "TOOL_CALLED(actions.export_json)",
            "TOOL_RESULT(actions.export_json)",
            "TOOL_CALLED(actions.draft_email)",
            "TOOL_RESULT(actions.draft_email)",
            "STATUS_CHANGED(EXECUTING->VERIFIED)",
            "STATUS_CHANGED(VERIFIED->ACTED)",
            "STATUS_CHANGED(ACTED->SUCCEEDED)",
        ]
    );

    assert_eq!(
        artifact_names(&store, &job).await,
        ["extracted_json", "verification_report", "export_result", "email_draft"]
    );
}

#[tokio::test]
async fn failed_verification_halts_tickets_and_fails() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;

    let outcome = run_job(&store, &job.id, &failing_registry()).await.unwrap();
    assert_eq!(outcome.final_status, JobStatus::Failed);
    assert_eq!(outcome.signals.get("verification.verdict"), Some(&json!("FAIL")));

    let events = store.events(&job.id).await.unwrap();
    assert_eq!(
        timeline(&events),
        [
            "JOB_CREATED",
            "STATUS_CHANGED(RECEIVED->PREPROCESSED)",
            "STATUS_CHANGED(PREPROCESSED->ROUTED)",
            "STATUS_CHANGED(ROUTED->PLANNED)",
            "STATUS_CHANGED(PLANNED->EXECUTING)",
            "TOOL_CALLED(extraction.run)",
            "TOOL_RESULT(extraction.run)",
            "TOOL_CALLED(verification.run)",
            "TOOL_RESULT(verification.run)",
            "TOOL_CALLED(actions.export_json)",
            "TOOL_RESULT(actions.export_json)",
            "TOOL_CALLED(actions.create_ticket)",
            "TOOL_RESULT(actions.create_ticket)",
            "EXECUTOR_HALTED",
            "STATUS_CHANGED(EXECUTING->VERIFIED)",
            "STATUS_CHANGED(VERIFIED->ACTED)",
            "STATUS_CHANGED(ACTED->FAILED)",
        ]
    );

    let halt = events
        .iter()
        .find(|e| e.event_type == docops_core::AuditEventType::ExecutorHalted)
        .unwrap();
    assert_eq!(halt.payload["reason"], json!("verification_failed"));

    // The FAIL branch creates a ticket, never the PASS email.
    let names = artifact_names(&store, &job).await;
    assert!(names.contains(&"ticket".to_string()));
    assert!(!names.contains(&"email_draft".to_string()));
}

#[tokio::test]
async fn warn_verification_needs_review_without_halt() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;

    let outcome = run_job(&store, &job.id, &registry_with_verdict("WARN")).await.unwrap();
    assert_eq!(outcome.final_status, JobStatus::NeedsReview);
    assert_eq!(outcome.signals.get("verification.verdict"), Some(&json!("WARN")));

    let events = store.events(&job.id).await.unwrap();
    let rendered = timeline(&events);
    assert!(rendered.contains(&"TOOL_CALLED(actions.create_ticket)".to_string()));
    assert!(!rendered.iter().any(|t| t == "EXECUTOR_HALTED"));
    assert_eq!(rendered.last().unwrap(), "STATUS_CHANGED(ACTED->NEEDS_REVIEW)");

    let names = artifact_names(&store, &job).await;
    assert!(names.contains(&"ticket".to_string()));
}

#[tokio::test]
async fn audit_order_is_causal_within_the_run() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;
    run_job(&store, &job.id, &passing_registry()).await.unwrap();

    let events = store.events(&job.id).await.unwrap();
    // Ids strictly increase and the EXECUTING transition precedes the
    // first tool call it enables.
    for pair in events.windows(2) {
        assert!(pair[0].id < pair[1].id);
    }
    let executing_pos = events
        .iter()
        .position(|e| {
            e.event_type == docops_core::AuditEventType::StatusChanged
                && e.payload["to"] == json!("EXECUTING")
        })
        .unwrap();
    let first_call = events
        .iter()
        .position(|e| e.event_type == docops_core::AuditEventType::ToolCalled)
        .unwrap();
    assert!(executing_pos < first_call);
}
