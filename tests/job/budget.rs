//! Budget exhaustion scenarios.

use crate::prelude::*;
use docops_core::{tool_names, ToolInputs, ToolPolicy};
use docops_engine::{BoundedExecutor, BudgetKind, EngineError, ExecLimits, ExecState};
use docops_storage::{MemoryStore, Store};
use docops_tools::ToolCtx;
use serde_json::json;

#[tokio::test]
async fn single_tool_call_budget_stops_the_second_step() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;
    let registry = passing_registry();
    let policy = ToolPolicy::default_policy();

    let executor = BoundedExecutor::new(ExecLimits {
        max_steps: 12,
        max_tool_calls: 1,
        max_cost_units: 20,
    });
    let mut state = ExecState::default();
    let ctx = ToolCtx::new(job.id, "general");

    // Extraction fits in the budget.
    let extraction = registry.get(tool_names::EXTRACTION_RUN).unwrap();
    let inputs = ToolInputs::from_iter([
        ("schema_id".to_string(), json!("general.v1")),
        ("pipeline_id".to_string(), json!("general.default")),
        ("source_text".to_string(), json!("x")),
    ]);
    executor
        .run_tool(
            &store,
            &job.id,
            tool_names::EXTRACTION_RUN,
            extraction.as_ref(),
            &inputs,
            &ctx,
            &mut state,
            &policy,
        )
        .await
        .unwrap();

    // Verification is rejected before invocation.
    let verification = registry.get(tool_names::VERIFICATION_RUN).unwrap();
    let err = executor
        .run_tool(
            &store,
            &job.id,
            tool_names::VERIFICATION_RUN,
            verification.as_ref(),
            &ToolInputs::new(),
            &ctx,
            &mut state,
            &policy,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::BudgetExceeded(BudgetKind::MaxToolCalls)));

    // Exactly one TOOL_CALLED / TOOL_RESULT pair.
    let rendered = timeline(&store.events(&job.id).await.unwrap());
    let calls: Vec<&String> =
        rendered.iter().filter(|t| t.starts_with("TOOL_CALLED")).collect();
    let results: Vec<&String> =
        rendered.iter().filter(|t| t.starts_with("TOOL_RESULT")).collect();
    assert_eq!(calls, ["TOOL_CALLED(extraction.run)"]);
    assert_eq!(results, ["TOOL_RESULT(extraction.run)"]);
}

#[tokio::test]
async fn budget_counters_never_decrease() {
    let store = MemoryStore::new();
    let job = create_job(&store, Some("x")).await;
    let registry = passing_registry();
    let policy = ToolPolicy::default_policy();

    let executor = BoundedExecutor::new(ExecLimits {
        max_steps: 12,
        max_tool_calls: 8,
        max_cost_units: 20,
    });
    let mut state = ExecState::default();
    let ctx = ToolCtx::new(job.id, "general");
    let export = registry.get(tool_names::ACTIONS_EXPORT_JSON).unwrap();

    let mut last = state;
    for _ in 0..3 {
        executor
            .run_tool(
                &store,
                &job.id,
                tool_names::ACTIONS_EXPORT_JSON,
                export.as_ref(),
                &ToolInputs::new(),
                &ctx,
                &mut state,
                &policy,
            )
            .await
            .unwrap();
        assert!(state.steps > last.steps);
        assert!(state.tool_calls > last.tool_calls);
        assert!(state.cost_units > last.cost_units);
        assert!(state.cost_units <= 20);
        last = state;
    }
}
