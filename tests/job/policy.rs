//! Deny-by-default policy scenarios.

use crate::prelude::*;
use docops_core::{AuditEventType, ToolPolicy};
use docops_engine::{run_job_with_policy, EngineError};
use docops_storage::{MemoryStore, Store};
use serde_json::json;

#[tokio::test]
async fn empty_policy_denies_the_first_tool() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;

    let err = run_job_with_policy(&store, &job.id, &passing_registry(), &ToolPolicy::deny_all())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PolicyDenied(tool) if tool == "extraction.run"));

    let events = store.events(&job.id).await.unwrap();
    let denied = events
        .iter()
        .find(|e| e.event_type == AuditEventType::PolicyDenied)
        .unwrap();
    assert_eq!(
        denied.payload,
        json!({"tool": "extraction.run", "reason": "deny_by_default"})
    );

    // No tool was called and nothing was extracted.
    let types: Vec<AuditEventType> = events.iter().map(|e| e.event_type).collect();
    assert!(!types.contains(&AuditEventType::ToolCalled));
    assert!(!types.contains(&AuditEventType::ToolResult));
    assert!(artifact_names(&store, &job).await.is_empty());
}

#[tokio::test]
async fn audit_inputs_stay_within_the_policy_whitelist() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("CONFIDENTIAL")).await;
    let policy = ToolPolicy::default_policy();

    docops_engine::run_job(&store, &job.id, &passing_registry()).await.unwrap();

    for event in store.events(&job.id).await.unwrap() {
        if event.event_type != AuditEventType::ToolCalled {
            continue;
        }
        let tool = event.payload["tool"].as_str().unwrap();
        let allowed = policy.allowed_audit_keys(tool);
        let inputs = event.payload["inputs"].as_object().unwrap();
        for key in inputs.keys() {
            assert!(allowed.contains(key), "{tool} audit leaked input key {key}");
        }
    }
}

#[tokio::test]
async fn tool_result_payloads_contain_key_names_only() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;
    docops_engine::run_job(&store, &job.id, &passing_registry()).await.unwrap();

    for event in store.events(&job.id).await.unwrap() {
        if event.event_type != AuditEventType::ToolResult {
            continue;
        }
        let keys = event.payload["result_keys"].as_array().unwrap();
        assert!(keys.iter().all(|k| k.is_string()));
        let mut sorted: Vec<&str> = keys.iter().filter_map(|k| k.as_str()).collect();
        sorted.sort_unstable();
        let original: Vec<&str> = keys.iter().filter_map(|k| k.as_str()).collect();
        assert_eq!(original, sorted, "result_keys must be sorted");
    }
}
