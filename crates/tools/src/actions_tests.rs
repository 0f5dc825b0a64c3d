// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use docops_core::JobId;
use serde_json::json;

fn ctx() -> ToolCtx {
    ToolCtx::new(JobId::new(), "general")
}

#[tokio::test]
async fn export_json_reports_exported() {
    let inputs = ToolInputs::from_iter([("extracted".to_string(), json!({"fields": {}}))]);
    let output = ExportJsonTool.run(&inputs, &ctx()).await.unwrap();
    assert_eq!(output.get("exported"), Some(&json!(true)));
}

#[tokio::test]
async fn export_json_tolerates_missing_extraction() {
    let output = ExportJsonTool.run(&ToolInputs::new(), &ctx()).await.unwrap();
    assert_eq!(output.get("exported"), Some(&json!(true)));
}

#[tokio::test]
async fn draft_email_builds_subject_from_template() {
    let inputs = ToolInputs::from_iter([
        ("to".to_string(), json!("ops@example.com")),
        ("template_id".to_string(), json!("general_processed")),
        ("extracted".to_string(), json!({"fields": {}})),
    ]);
    let output = DraftEmailTool.run(&inputs, &ctx()).await.unwrap();

    assert_eq!(output.get("to"), Some(&json!("ops@example.com")));
    assert_eq!(output.get("subject"), Some(&json!("[DOCOPS] general_processed")));
    assert!(output.get("body").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn draft_email_requires_recipient() {
    let inputs = ToolInputs::from_iter([("template_id".to_string(), json!("x"))]);
    let err = DraftEmailTool.run(&inputs, &ctx()).await.unwrap_err();
    assert!(matches!(err, ToolError::InvalidInput { .. }));
}

#[tokio::test]
async fn create_ticket_mints_an_id() {
    let inputs = ToolInputs::from_iter([
        ("reason".to_string(), json!("verification_warn")),
        ("report".to_string(), json!({"verdict": "WARN"})),
    ]);
    let output = CreateTicketTool.run(&inputs, &ctx()).await.unwrap();

    let ticket_id = output.get("ticket_id").and_then(|v| v.as_str()).unwrap();
    assert!(ticket_id.starts_with("TCK-"));
    assert_eq!(ticket_id.len(), "TCK-".len() + 6);
    assert_eq!(output.get("status"), Some(&json!("CREATED")));
}

#[tokio::test]
async fn create_ticket_ids_are_unique() {
    let inputs = ToolInputs::new();
    let a = CreateTicketTool.run(&inputs, &ctx()).await.unwrap();
    let b = CreateTicketTool.run(&inputs, &ctx()).await.unwrap();
    assert_ne!(a.get("ticket_id"), b.get("ticket_id"));
}
