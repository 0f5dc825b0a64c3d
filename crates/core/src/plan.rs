// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plan DSL: a validated, ordered list of steps for a single job run.
//!
//! Plans are transient. The planner builds one per run; nothing about the
//! plan is persisted, so re-running a job rebuilds the plan from scratch.

use crate::job::JobId;
use crate::signals::Signals;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Wire version of the plan DSL.
pub const PLAN_VERSION: &str = "1.0";

/// Loose key/value inputs handed to a tool.
pub type ToolInputs = IndexMap<String, Value>;

/// Kind of work a plan step performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Extract,
    Verify,
    Action,
    Halt,
}

crate::string_enum! {
    StepKind {
        Extract => "extract",
        Verify => "verify",
        Action => "action",
        Halt => "halt",
    }
}

/// Gating predicate evaluated against the working signals.
///
/// A step with no predicate always matches; a non-matching step is
/// skipped silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum When {
    Equals {
        signal: String,
        equals: Value,
    },
    In {
        signal: String,
        #[serde(rename = "in")]
        any_of: Vec<Value>,
    },
}

impl When {
    pub fn equals(signal: impl Into<String>, value: impl Into<Value>) -> Self {
        When::Equals { signal: signal.into(), equals: value.into() }
    }

    pub fn any_of(signal: impl Into<String>, values: Vec<Value>) -> Self {
        When::In { signal: signal.into(), any_of: values }
    }

    /// Evaluate the predicate. An absent signal only matches an explicit
    /// `equals: null`.
    pub fn matches(&self, signals: &Signals) -> bool {
        match self {
            When::Equals { signal, equals } => {
                signals.get(signal).unwrap_or(&Value::Null) == equals
            }
            When::In { signal, any_of } => {
                let value = signals.get(signal).unwrap_or(&Value::Null);
                any_of.contains(value)
            }
        }
    }
}

/// Resource limits for one plan execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub max_steps: u32,
    pub max_tool_calls: u32,
    pub max_cost_units: u32,
    /// Single-shot plans only: replanning is introduced at the runner
    /// level, never inside the executor.
    pub max_replans: u32,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self { max_steps: 12, max_tool_calls: 10, max_cost_units: 200, max_replans: 0 }
    }
}

impl PlanLimits {
    crate::setters! {
        set {
            max_steps: u32,
            max_tool_calls: u32,
            max_cost_units: u32,
        }
    }
}

/// One step of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// Registered tool name; required unless `kind` is `Halt`.
    pub tool: Option<String>,
    #[serde(default)]
    pub inputs: ToolInputs,
    pub when: Option<When>,
    /// Halt explanation; required iff `kind` is `Halt`.
    pub reason: Option<String>,
}

impl PlanStep {
    pub fn extract(id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self::tool_step(id, StepKind::Extract, tool)
    }

    pub fn verify(id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self::tool_step(id, StepKind::Verify, tool)
    }

    pub fn action(id: impl Into<String>, tool: impl Into<String>) -> Self {
        Self::tool_step(id, StepKind::Action, tool)
    }

    pub fn halt(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: StepKind::Halt,
            tool: None,
            inputs: ToolInputs::new(),
            when: None,
            reason: Some(reason.into()),
        }
    }

    fn tool_step(id: impl Into<String>, kind: StepKind, tool: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            tool: Some(tool.into()),
            inputs: ToolInputs::new(),
            when: None,
            reason: None,
        }
    }

    crate::setters! {
        set {
            inputs: ToolInputs,
        }
        option {
            when: When,
        }
    }

    /// Whether the step's gate matches the given signals.
    pub fn gate_matches(&self, signals: &Signals) -> bool {
        self.when.as_ref().is_none_or(|w| w.matches(signals))
    }
}

/// Plan construction failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("plan exceeds max_steps ({count} > {max})")]
    TooManySteps { count: usize, max: u32 },
    #[error("duplicate step id: {0}")]
    DuplicateStepId(String),
    #[error("step {step}: {kind} step requires a tool")]
    MissingTool { step: String, kind: StepKind },
    #[error("step {step}: halt step requires a reason")]
    MissingReason { step: String },
}

/// A validated ordered list of steps describing the work for one job run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    version: String,
    job_id: JobId,
    limits: PlanLimits,
    steps: Vec<PlanStep>,
}

impl Plan {
    /// Validate and construct a plan.
    ///
    /// Rejects duplicate step ids, more steps than `limits.max_steps`,
    /// tool steps without a tool, and halt steps without a reason.
    pub fn new(job_id: JobId, limits: PlanLimits, steps: Vec<PlanStep>) -> Result<Self, PlanError> {
        if steps.len() > limits.max_steps as usize {
            return Err(PlanError::TooManySteps { count: steps.len(), max: limits.max_steps });
        }

        let mut seen = std::collections::HashSet::new();
        for step in &steps {
            if !seen.insert(step.id.as_str()) {
                return Err(PlanError::DuplicateStepId(step.id.clone()));
            }
            match step.kind {
                StepKind::Halt => {
                    if step.reason.as_deref().is_none_or(str::is_empty) {
                        return Err(PlanError::MissingReason { step: step.id.clone() });
                    }
                }
                kind => {
                    if step.tool.as_deref().is_none_or(str::is_empty) {
                        return Err(PlanError::MissingTool { step: step.id.clone(), kind });
                    }
                }
            }
        }

        Ok(Self { version: PLAN_VERSION.to_string(), job_id, limits, steps })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn limits(&self) -> &PlanLimits {
        &self.limits
    }

    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod tests;
