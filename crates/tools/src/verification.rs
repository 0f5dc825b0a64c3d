// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic verification rules (`verification.run`). No LLM.
//!
//! Produces a PASS/WARN/FAIL report: any failed HARD check fails the
//! document, failed SOFT checks alone downgrade it to WARN.

use async_trait::async_trait;
use docops_core::{tool_names, ToolInputs, Verdict};
use serde_json::{json, Value};

use crate::contracts::{
    decode_inputs, encode_output, Check, CheckSeverity, VerificationInput, VerificationOutput,
    VerificationReport,
};
use crate::tool::{Tool, ToolCtx, ToolError, ToolOutput};

/// The `verification.run` tool.
pub struct VerificationTool;

#[async_trait]
impl Tool for VerificationTool {
    fn name(&self) -> &str {
        tool_names::VERIFICATION_RUN
    }

    async fn run(&self, inputs: &ToolInputs, _ctx: &ToolCtx) -> Result<ToolOutput, ToolError> {
        let input: VerificationInput = decode_inputs(self.name(), inputs)?;
        let report = verify(&input.domain, &input.schema_id, &input.source_text, &input.extracted);
        encode_output(self.name(), &VerificationOutput { report })
    }
}

struct Checks {
    checks: Vec<Check>,
    hard_fail: bool,
    soft_fail: bool,
}

impl Checks {
    fn new() -> Self {
        Self { checks: Vec::new(), hard_fail: false, soft_fail: false }
    }

    fn add(&mut self, name: &str, pass: bool, severity: CheckSeverity, details: Value) {
        if !pass {
            match severity {
                CheckSeverity::Hard => self.hard_fail = true,
                CheckSeverity::Soft => self.soft_fail = true,
            }
        }
        self.checks.push(Check { name: name.to_string(), pass, severity, details });
    }

    fn into_report(self) -> VerificationReport {
        let verdict = if self.hard_fail {
            Verdict::Fail
        } else if self.soft_fail {
            Verdict::Warn
        } else {
            Verdict::Pass
        };
        VerificationReport { verdict, checks: self.checks }
    }
}

fn present_str(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).is_some_and(|s| !s.trim().is_empty())
}

fn present_num(value: Option<&Value>) -> bool {
    value.is_some_and(Value::is_number)
}

fn fields_of(extracted: &Value) -> &Value {
    match extracted.get("fields") {
        Some(fields) if fields.is_object() => fields,
        _ => &Value::Null,
    }
}

/// Run the domain rule pack against an extraction envelope.
pub fn verify(
    domain: &str,
    _schema_id: &str,
    _source_text: &str,
    extracted: &Value,
) -> VerificationReport {
    let fields = fields_of(extracted);
    let has_fields = fields.as_object().is_some_and(|f| !f.is_empty());
    let mut checks = Checks::new();

    // Universal checks
    let field_keys: Vec<&String> = fields
        .as_object()
        .map(|f| f.keys().take(20).collect())
        .unwrap_or_default();
    checks.add("has_fields", has_fields, CheckSeverity::Hard, json!({ "keys": field_keys }));

    // Domain rule packs
    match domain {
        "finance" => {
            checks.add(
                "vendor_present",
                present_str(fields.get("vendor")),
                CheckSeverity::Soft,
                json!({}),
            );
            checks.add(
                "total_present",
                present_num(fields.get("total")) || present_str(fields.get("total")),
                CheckSeverity::Soft,
                json!({}),
            );
            checks.add(
                "currency_present",
                present_str(fields.get("currency")),
                CheckSeverity::Soft,
                json!({}),
            );
        }
        "legal" => {
            checks.add(
                "parties_present",
                fields.get("parties").is_some_and(is_truthy),
                CheckSeverity::Soft,
                json!({}),
            );
            checks.add(
                "effective_date_present",
                present_str(fields.get("effective_date")),
                CheckSeverity::Soft,
                json!({}),
            );
            checks.add(
                "governing_law_present",
                present_str(fields.get("governing_law")),
                CheckSeverity::Soft,
                json!({}),
            );
        }
        _ => {
            checks.add("non_empty_fields", has_fields, CheckSeverity::Soft, json!({}));
        }
    }

    checks.into_report()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
#[path = "verification_tests.rs"]
mod tests;
