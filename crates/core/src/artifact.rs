// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifacts: named structured outputs produced during execution.

use crate::job::JobId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known artifact names.
///
/// Multiple artifacts may share a name; readers take the latest by id.
pub mod names {
    pub const EXTRACTED_JSON: &str = "extracted_json";
    pub const VERIFICATION_REPORT: &str = "verification_report";
    pub const EXPORT_RESULT: &str = "export_result";
    pub const EMAIL_DRAFT: &str = "email_draft";
    pub const TICKET: &str = "ticket";
}

/// One append-only typed output row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Store-assigned, monotonically increasing.
    pub id: i64,
    pub job_id: JobId,
    pub name: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}
