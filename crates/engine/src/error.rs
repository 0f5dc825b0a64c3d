// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy.
//!
//! The runner does not catch these; the boundary handler does, drives the
//! job to FAILED where appropriate, and translates to the HTTP surface.

use docops_core::{JobId, PlanError, TransitionError};
use docops_storage::StoreError;
use docops_tools::ToolError;
use thiserror::Error;

/// Which budget was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetKind {
    MaxToolCalls,
    MaxCostUnits,
}

docops_core::string_enum! {
    BudgetKind {
        MaxToolCalls => "max_tool_calls",
        MaxCostUnits => "max_cost_units",
    }
}

/// Errors that can occur while running a job.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("job {0} has no source_text")]
    MissingSource(JobId),
    #[error("tool not registered: {0}")]
    ToolNotRegistered(String),
    #[error("policy denied tool: {0}")]
    PolicyDenied(String),
    #[error("step limit exceeded (max_steps={0})")]
    StepLimitExceeded(u32),
    #[error("budget exceeded: {0}")]
    BudgetExceeded(BudgetKind),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Tool(#[from] ToolError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_kind_names_match_limit_fields() {
        assert_eq!(BudgetKind::MaxToolCalls.to_string(), "max_tool_calls");
        assert_eq!(BudgetKind::MaxCostUnits.to_string(), "max_cost_units");
    }

    #[test]
    fn error_messages_name_the_offender() {
        let err = EngineError::PolicyDenied("shell.exec".to_string());
        assert_eq!(err.to_string(), "policy denied tool: shell.exec");

        let err = EngineError::BudgetExceeded(BudgetKind::MaxToolCalls);
        assert_eq!(err.to_string(), "budget exceeded: max_tool_calls");
    }
}
