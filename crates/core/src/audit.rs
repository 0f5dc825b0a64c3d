// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit events: the append-only, tamper-evident timeline of a job.

use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventType {
    JobCreated,
    StatusChanged,
    ToolCalled,
    ToolResult,
    PolicyDenied,
    ExecutorHalted,
    Error,
}

crate::string_enum! {
    AuditEventType {
        JobCreated => "JOB_CREATED",
        StatusChanged => "STATUS_CHANGED",
        ToolCalled => "TOOL_CALLED",
        ToolResult => "TOOL_RESULT",
        PolicyDenied => "POLICY_DENIED",
        ExecutorHalted => "EXECUTOR_HALTED",
        Error => "ERROR",
    }
}

/// One append-only timeline entry.
///
/// Never updated, never deleted. Ordering by `id` reflects causal order
/// within a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Store-assigned, monotonically increasing.
    pub id: i64,
    pub job_id: JobId,
    pub event_type: AuditEventType,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        job_created = { AuditEventType::JobCreated, "JOB_CREATED" },
        status_changed = { AuditEventType::StatusChanged, "STATUS_CHANGED" },
        tool_called = { AuditEventType::ToolCalled, "TOOL_CALLED" },
        tool_result = { AuditEventType::ToolResult, "TOOL_RESULT" },
        policy_denied = { AuditEventType::PolicyDenied, "POLICY_DENIED" },
        executor_halted = { AuditEventType::ExecutorHalted, "EXECUTOR_HALTED" },
        error = { AuditEventType::Error, "ERROR" },
    )]
    fn event_type_encoding(event_type: AuditEventType, expected: &str) {
        assert_eq!(event_type.to_string(), expected);
        assert_eq!(AuditEventType::parse(expected), Some(event_type));
        assert_eq!(serde_json::to_value(event_type).unwrap(), serde_json::json!(expected));

        let parsed: AuditEventType =
            serde_json::from_value(serde_json::json!(expected)).unwrap();
        assert_eq!(parsed, event_type);
    }

    #[test]
    fn parse_rejects_unknown_encodings() {
        assert_eq!(AuditEventType::parse("tool_called"), None);
        assert_eq!(AuditEventType::parse(""), None);
    }
}
