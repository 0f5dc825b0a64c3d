// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted tools for deterministic tests.

use async_trait::async_trait;
use docops_core::ToolInputs;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolCtx, ToolError, ToolOutput};

/// A tool that returns a canned result (or failure) and records every
/// call it receives.
pub struct ScriptedTool {
    name: String,
    result: Result<Value, ToolError>,
    calls: Mutex<Vec<ToolInputs>>,
}

impl ScriptedTool {
    /// Always succeed with `output` (must be a JSON object).
    pub fn new(name: impl Into<String>, output: Value) -> Self {
        Self { name: name.into(), result: Ok(output), calls: Mutex::new(Vec::new()) }
    }

    /// Always fail with an execution error.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let err = ToolError::Execution { tool: name.clone(), message: message.into() };
        Self { name, result: Err(err), calls: Mutex::new(Vec::new()) }
    }

    /// A `verification.run` double producing the given verdict.
    pub fn verifier(verdict: &str) -> Self {
        Self::new(
            docops_core::tool_names::VERIFICATION_RUN,
            json!({"report": {"verdict": verdict, "checks": []}}),
        )
    }

    /// Inputs seen so far, in call order.
    pub fn calls(&self) -> Vec<ToolInputs> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, inputs: &ToolInputs, _ctx: &ToolCtx) -> Result<ToolOutput, ToolError> {
        self.calls.lock().push(inputs.clone());
        match &self.result {
            Ok(Value::Object(map)) => Ok(map.clone().into_iter().collect()),
            Ok(other) => Err(ToolError::Execution {
                tool: self.name.clone(),
                message: format!("scripted output must be an object, got {other}"),
            }),
            Err(e) => Err(e.clone()),
        }
    }
}

/// Offline `extraction.run` double: echoes the routing inputs and emits a
/// fixed fields map (empty when constructed with `empty_fields`).
pub struct StubExtractionTool {
    fields: Value,
}

impl StubExtractionTool {
    pub fn new() -> Self {
        Self { fields: json!({"example": "value"}) }
    }

    /// Produce an empty fields map, which hard-fails verification.
    pub fn empty_fields() -> Self {
        Self { fields: json!({}) }
    }

    pub fn with_fields(fields: Value) -> Self {
        Self { fields }
    }
}

impl Default for StubExtractionTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for StubExtractionTool {
    fn name(&self) -> &str {
        docops_core::tool_names::EXTRACTION_RUN
    }

    async fn run(&self, inputs: &ToolInputs, _ctx: &ToolCtx) -> Result<ToolOutput, ToolError> {
        let schema_id = inputs.get("schema_id").cloned().unwrap_or(Value::Null);
        let pipeline_id = inputs.get("pipeline_id").cloned().unwrap_or(Value::Null);
        if !inputs.get("source_text").and_then(Value::as_str).is_some_and(|t| !t.is_empty()) {
            return Err(ToolError::Execution {
                tool: self.name().to_string(),
                message: "source_text is required for extraction".to_string(),
            });
        }

        let extracted = json!({
            "schema_id": schema_id,
            "pipeline_id": pipeline_id,
            "fields": self.fields,
        });
        Ok(ToolOutput::from_iter([("extracted".to_string(), extracted)]))
    }
}
