// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The planner: builds a plan and routing decision from the job's source.
//!
//! Deterministic and stateless with respect to the job row. The planner
//! is the single source of truth for routing; the runner never decides
//! routing itself.

use docops_core::{
    signal_keys, tool_names, JobId, Plan, PlanError, PlanLimits, PlanStep, Signals, ToolInputs,
    When,
};
use serde_json::json;

/// Routing decision attached to a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routing {
    pub domain: String,
    pub pipeline_id: String,
    pub schema_id: String,
}

impl Routing {
    /// The signal entries merged onto the job when routing is decided.
    pub fn as_signals(&self) -> Signals {
        Signals::from([
            (signal_keys::ROUTING_DOMAIN, json!(self.domain)),
            (signal_keys::ROUTING_PIPELINE_ID, json!(self.pipeline_id)),
            (signal_keys::ROUTING_SCHEMA_ID, json!(self.schema_id)),
        ])
    }
}

/// Build the default plan for a job.
///
/// The runner augments step inputs with the runner-owned bindings
/// (`source_text`, `extracted`, `report`) at execution time; the plan
/// carries only the static inputs.
pub fn build_plan(job_id: &JobId, _source_text: &str) -> Result<(Plan, Routing), PlanError> {
    let routing = Routing {
        domain: "general".to_string(),
        pipeline_id: "general.default".to_string(),
        schema_id: "general.v1".to_string(),
    };

    let limits = PlanLimits::default().max_steps(12).max_tool_calls(8).max_cost_units(20);

    let steps = vec![
        PlanStep::extract("extract", tool_names::EXTRACTION_RUN).inputs(ToolInputs::from_iter([
            ("schema_id".to_string(), json!(routing.schema_id)),
            ("pipeline_id".to_string(), json!(routing.pipeline_id)),
        ])),
        PlanStep::verify("verify", tool_names::VERIFICATION_RUN).inputs(ToolInputs::from_iter([
            ("domain".to_string(), json!(routing.domain)),
            ("schema_id".to_string(), json!(routing.schema_id)),
        ])),
        PlanStep::action("export_json", tool_names::ACTIONS_EXPORT_JSON),
        PlanStep::action("ticket_warn", tool_names::ACTIONS_CREATE_TICKET)
            .when(When::equals(signal_keys::VERIFICATION_VERDICT, "WARN"))
            .inputs(ToolInputs::from_iter([(
                "reason".to_string(),
                json!("verification_warn"),
            )])),
        PlanStep::action("ticket_fail", tool_names::ACTIONS_CREATE_TICKET)
            .when(When::equals(signal_keys::VERIFICATION_VERDICT, "FAIL"))
            .inputs(ToolInputs::from_iter([(
                "reason".to_string(),
                json!("verification_fail"),
            )])),
        PlanStep::action("email_pass", tool_names::ACTIONS_DRAFT_EMAIL)
            .when(When::equals(signal_keys::VERIFICATION_VERDICT, "PASS"))
            .inputs(ToolInputs::from_iter([
                ("to".to_string(), json!("ops@example.com")),
                ("template_id".to_string(), json!(format!("{}_processed", routing.domain))),
            ])),
        PlanStep::halt("halt_on_fail", "verification_failed")
            .when(When::equals(signal_keys::VERIFICATION_VERDICT, "FAIL")),
    ];

    let plan = Plan::new(*job_id, limits, steps)?;
    Ok((plan, routing))
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
