// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed wire contracts for the pipeline tools.
//!
//! Tools exchange loose maps at the executor boundary; these structs give
//! each tool a validated view of its inputs and a canonical output shape.

use crate::tool::{ToolError, ToolOutput};
use docops_core::{ToolInputs, Verdict};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decode loose inputs into a tool's typed input struct.
pub fn decode_inputs<T: DeserializeOwned>(tool: &str, inputs: &ToolInputs) -> Result<T, ToolError> {
    let object: serde_json::Map<String, Value> =
        inputs.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    serde_json::from_value(Value::Object(object)).map_err(|e| ToolError::InvalidInput {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Encode a tool's typed output struct as a loose result map.
pub fn encode_output<T: Serialize>(tool: &str, output: &T) -> Result<ToolOutput, ToolError> {
    let value = serde_json::to_value(output).map_err(|e| ToolError::Execution {
        tool: tool.to_string(),
        message: format!("output encoding failed: {e}"),
    })?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(ToolError::Execution {
            tool: tool.to_string(),
            message: format!("tool output must be an object, got {other}"),
        }),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionInput {
    pub schema_id: String,
    pub pipeline_id: String,
    #[serde(default)]
    pub source_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Envelope `{schema_id, pipeline_id, fields}`.
    pub extracted: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationInput {
    pub domain: String,
    pub schema_id: String,
    #[serde(default)]
    pub source_text: String,
    #[serde(default)]
    pub extracted: Value,
}

/// Severity of a verification check. A failed HARD check fails the
/// document; failed SOFT checks only warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckSeverity {
    Hard,
    Soft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    pub pass: bool,
    pub severity: CheckSeverity,
    #[serde(default)]
    pub details: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub verdict: Verdict,
    #[serde(default)]
    pub checks: Vec<Check>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutput {
    pub report: VerificationReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJsonInput {
    #[serde(default)]
    pub extracted: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJsonOutput {
    pub exported: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftEmailInput {
    pub to: String,
    pub template_id: String,
    #[serde(default)]
    pub extracted: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftEmailOutput {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketInput {
    /// Queue the ticket lands in; defaults to the ops queue.
    #[serde(default)]
    pub queue: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Plan-supplied reason, e.g. `verification_warn`.
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub report: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTicketOutput {
    pub ticket_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use docops_core::ToolInputs;
    use serde_json::json;

    #[test]
    fn decode_rejects_missing_required_keys() {
        let inputs = ToolInputs::from_iter([("schema_id".to_string(), json!("general.v1"))]);
        let err = decode_inputs::<ExtractionInput>("extraction.run", &inputs).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput { tool, .. } if tool == "extraction.run"));
    }

    #[test]
    fn decode_fills_defaults() {
        let inputs = ToolInputs::from_iter([
            ("schema_id".to_string(), json!("general.v1")),
            ("pipeline_id".to_string(), json!("general.default")),
        ]);
        let input = decode_inputs::<ExtractionInput>("extraction.run", &inputs).unwrap();
        assert_eq!(input.source_text, "");
    }

    #[test]
    fn encode_produces_result_map() {
        let output = ExportJsonOutput { exported: true };
        let map = encode_output("actions.export_json", &output).unwrap();
        assert_eq!(map.get("exported"), Some(&json!(true)));
    }

    #[test]
    fn report_serde_roundtrip() {
        let report = VerificationReport {
            verdict: Verdict::Warn,
            checks: vec![Check {
                name: "vendor_present".to_string(),
                pass: false,
                severity: CheckSeverity::Soft,
                details: json!({}),
            }],
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["verdict"], json!("WARN"));
        assert_eq!(value["checks"][0]["severity"], json!("SOFT"));
    }
}
