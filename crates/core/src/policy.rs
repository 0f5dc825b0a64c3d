// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tool capability policy: deny-by-default allow-list plus per-tool
//! audit-input redaction whitelist.

use crate::plan::ToolInputs;
use std::collections::{BTreeMap, BTreeSet};

/// Registered tool names.
pub mod tool_names {
    pub const EXTRACTION_RUN: &str = "extraction.run";
    pub const VERIFICATION_RUN: &str = "verification.run";
    pub const ACTIONS_EXPORT_JSON: &str = "actions.export_json";
    pub const ACTIONS_DRAFT_EMAIL: &str = "actions.draft_email";
    pub const ACTIONS_CREATE_TICKET: &str = "actions.create_ticket";
}

/// Immutable capability policy.
///
/// A tool absent from `allowed_tools` is rejected. Audit payloads only
/// ever contain input keys listed in `audit_allow_keys`; everything else
/// is omitted, not masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPolicy {
    allowed_tools: BTreeSet<String>,
    audit_allow_keys: BTreeMap<String, BTreeSet<String>>,
}

impl ToolPolicy {
    pub fn new(
        allowed_tools: BTreeSet<String>,
        audit_allow_keys: BTreeMap<String, BTreeSet<String>>,
    ) -> Self {
        Self { allowed_tools, audit_allow_keys }
    }

    /// Policy that rejects every tool.
    pub fn deny_all() -> Self {
        Self { allowed_tools: BTreeSet::new(), audit_allow_keys: BTreeMap::new() }
    }

    /// Deny by default.
    pub fn is_allowed(&self, tool_name: &str) -> bool {
        self.allowed_tools.contains(tool_name)
    }

    /// Input keys that may be copied into audit payloads for this tool.
    pub fn allowed_audit_keys(&self, tool_name: &str) -> BTreeSet<String> {
        self.audit_allow_keys.get(tool_name).cloned().unwrap_or_default()
    }

    /// Project inputs down to the audit-safe subset for this tool.
    pub fn redact_inputs(&self, tool_name: &str, inputs: &ToolInputs) -> ToolInputs {
        let allowed = self.audit_allow_keys.get(tool_name);
        inputs
            .iter()
            .filter(|(key, _)| allowed.is_some_and(|keys| keys.contains(key.as_str())))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// The standard platform policy: exactly the five pipeline tools, with
    /// document text and extraction payloads redacted from audit.
    pub fn default_policy() -> Self {
        use tool_names::*;

        fn keys(items: &[&str]) -> BTreeSet<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        let allowed_tools = keys(&[
            EXTRACTION_RUN,
            VERIFICATION_RUN,
            ACTIONS_EXPORT_JSON,
            ACTIONS_DRAFT_EMAIL,
            ACTIONS_CREATE_TICKET,
        ]);

        let mut audit_allow_keys = BTreeMap::new();
        audit_allow_keys.insert(EXTRACTION_RUN.to_string(), keys(&["schema_id", "pipeline_id"]));
        audit_allow_keys.insert(VERIFICATION_RUN.to_string(), keys(&["domain", "schema_id"]));
        audit_allow_keys.insert(ACTIONS_EXPORT_JSON.to_string(), keys(&[]));
        audit_allow_keys.insert(ACTIONS_DRAFT_EMAIL.to_string(), keys(&["to", "template_id"]));
        audit_allow_keys.insert(ACTIONS_CREATE_TICKET.to_string(), keys(&["queue", "title"]));

        Self { allowed_tools, audit_allow_keys }
    }
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
