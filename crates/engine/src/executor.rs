// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded executor: one tool call under policy and budget.
//!
//! Invariants:
//! - policy denial precedes any budget mutation
//! - a tool is never invoked without a preceding TOOL_CALLED audit
//! - every successful invocation emits exactly one TOOL_RESULT
//! - budget counters never decrease within a run

use docops_core::{AuditEventType, JobId, PlanLimits, ToolInputs, ToolPolicy};
use docops_storage::Store;
use docops_tools::{Tool, ToolCtx, ToolOutput};
use serde_json::json;

use crate::error::{BudgetKind, EngineError};

/// Budget limits for one run, taken from the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecLimits {
    pub max_steps: u32,
    pub max_tool_calls: u32,
    pub max_cost_units: u32,
}

impl From<&PlanLimits> for ExecLimits {
    fn from(limits: &PlanLimits) -> Self {
        Self {
            max_steps: limits.max_steps,
            max_tool_calls: limits.max_tool_calls,
            max_cost_units: limits.max_cost_units,
        }
    }
}

/// Budget counters scoped to a single run of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecState {
    pub steps: u32,
    pub tool_calls: u32,
    pub cost_units: u32,
}

/// Runs one tool call at a time; owns no state beyond its limits.
pub struct BoundedExecutor {
    limits: ExecLimits,
}

impl BoundedExecutor {
    pub fn new(limits: ExecLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExecLimits {
        &self.limits
    }

    fn charge(&self, state: &mut ExecState, cost: u32) -> Result<(), EngineError> {
        state.cost_units += cost;
        if state.cost_units > self.limits.max_cost_units {
            return Err(EngineError::BudgetExceeded(BudgetKind::MaxCostUnits));
        }
        Ok(())
    }

    /// Run one tool call. The order of actions is contractual:
    /// policy gate, budget check, budget charge, redacted TOOL_CALLED,
    /// invocation, TOOL_RESULT.
    #[allow(clippy::too_many_arguments)]
    pub async fn run_tool(
        &self,
        store: &dyn Store,
        job_id: &JobId,
        tool_name: &str,
        tool: &dyn Tool,
        inputs: &ToolInputs,
        ctx: &ToolCtx,
        state: &mut ExecState,
        policy: &ToolPolicy,
    ) -> Result<ToolOutput, EngineError> {
        // 1. Policy gate — before any budget is charged.
        if !policy.is_allowed(tool_name) {
            store
                .append_event(
                    job_id,
                    AuditEventType::PolicyDenied,
                    json!({ "tool": tool_name, "reason": "deny_by_default" }),
                )
                .await?;
            tracing::warn!(job_id = %job_id, tool = tool_name, "policy denied tool call");
            return Err(EngineError::PolicyDenied(tool_name.to_string()));
        }

        // 2. Budget check.
        if state.steps >= self.limits.max_steps {
            return Err(EngineError::StepLimitExceeded(self.limits.max_steps));
        }
        if state.tool_calls >= self.limits.max_tool_calls {
            return Err(EngineError::BudgetExceeded(BudgetKind::MaxToolCalls));
        }

        // 3. Budget charge — before invocation, so a failing tool still
        // consumes budget.
        state.steps += 1;
        state.tool_calls += 1;
        self.charge(state, 1)?;

        // 4. Redacted TOOL_CALLED.
        let safe_inputs = policy.redact_inputs(tool_name, inputs);
        store
            .append_event(
                job_id,
                AuditEventType::ToolCalled,
                json!({ "tool": tool_name, "inputs": safe_inputs }),
            )
            .await?;

        // 5. Invoke.
        let result = tool.run(inputs, ctx).await?;

        // 6. TOOL_RESULT — key names only, never values.
        let mut result_keys: Vec<&str> = result.keys().map(String::as_str).collect();
        result_keys.sort_unstable();
        store
            .append_event(
                job_id,
                AuditEventType::ToolResult,
                json!({ "tool": tool_name, "result_keys": result_keys }),
            )
            .await?;

        Ok(result)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
