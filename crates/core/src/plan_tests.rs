// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn limits(max_steps: u32) -> PlanLimits {
    PlanLimits::default().max_steps(max_steps)
}

#[test]
fn plan_accepts_distinct_steps() {
    let steps = vec![
        PlanStep::extract("extract", "extraction.run"),
        PlanStep::verify("verify", "verification.run"),
        PlanStep::halt("halt", "done"),
    ];
    let plan = Plan::new(JobId::from_string("j1"), limits(12), steps).unwrap();

    assert_eq!(plan.version(), PLAN_VERSION);
    assert_eq!(plan.steps().len(), 3);
    assert_eq!(plan.job_id(), &JobId::from_string("j1"));
}

#[test]
fn plan_rejects_duplicate_step_ids() {
    let steps = vec![
        PlanStep::extract("same", "extraction.run"),
        PlanStep::verify("same", "verification.run"),
    ];
    let err = Plan::new(JobId::from_string("j1"), limits(12), steps).unwrap_err();
    assert_eq!(err, PlanError::DuplicateStepId("same".to_string()));
}

#[test]
fn plan_rejects_too_many_steps() {
    let steps: Vec<PlanStep> = (0..3)
        .map(|i| PlanStep::action(format!("step-{i}"), "actions.export_json"))
        .collect();
    let err = Plan::new(JobId::from_string("j1"), limits(2), steps).unwrap_err();
    assert_eq!(err, PlanError::TooManySteps { count: 3, max: 2 });
}

#[test]
fn plan_rejects_tool_step_without_tool() {
    let mut step = PlanStep::action("export", "actions.export_json");
    step.tool = None;
    let err = Plan::new(JobId::from_string("j1"), limits(12), vec![step]).unwrap_err();
    assert_eq!(err, PlanError::MissingTool { step: "export".to_string(), kind: StepKind::Action });
}

#[test]
fn plan_rejects_halt_without_reason() {
    let mut step = PlanStep::halt("stop", "why");
    step.reason = None;
    let err = Plan::new(JobId::from_string("j1"), limits(12), vec![step]).unwrap_err();
    assert_eq!(err, PlanError::MissingReason { step: "stop".to_string() });
}

#[yare::parameterized(
    matching_value = { When::equals("verification.verdict", "FAIL"), true },
    other_value = { When::equals("verification.verdict", "PASS"), false },
    absent_signal = { When::equals("routing.domain", "general"), false },
    member = { When::any_of("verification.verdict", vec![json!("WARN"), json!("FAIL")]), true },
    non_member = { When::any_of("verification.verdict", vec![json!("PASS")]), false },
)]
fn when_evaluates_against_signals(when: When, expected: bool) {
    let mut signals = Signals::new();
    signals.set("verification.verdict", json!("FAIL"));
    assert_eq!(when.matches(&signals), expected);
}

#[test]
fn absent_signal_matches_explicit_null() {
    let signals = Signals::new();
    assert!(When::equals("missing", Value::Null).matches(&signals));
    assert!(When::any_of("missing", vec![Value::Null]).matches(&signals));
}

#[test]
fn ungated_step_always_matches() {
    let signals = Signals::new();
    let step = PlanStep::extract("extract", "extraction.run");
    assert!(step.gate_matches(&signals));

    let gated = PlanStep::action("ticket", "actions.create_ticket")
        .when(When::equals("verification.verdict", "FAIL"));
    assert!(!gated.gate_matches(&signals));
}

#[test]
fn when_serde_uses_wire_shape() {
    let equals = When::equals("verification.verdict", "WARN");
    assert_eq!(
        serde_json::to_value(&equals).unwrap(),
        json!({"signal": "verification.verdict", "equals": "WARN"})
    );

    let any_of = When::any_of("routing.domain", vec![json!("legal"), json!("finance")]);
    assert_eq!(
        serde_json::to_value(&any_of).unwrap(),
        json!({"signal": "routing.domain", "in": ["legal", "finance"]})
    );

    let parsed: When =
        serde_json::from_value(json!({"signal": "x", "in": ["a"]})).unwrap();
    assert_eq!(parsed, When::any_of("x", vec![json!("a")]));
}

#[test]
fn step_serde_tags_kind_as_type() {
    let step = PlanStep::extract("extract", "extraction.run")
        .inputs(ToolInputs::from_iter([("schema_id".to_string(), json!("general.v1"))]));
    let value = serde_json::to_value(&step).unwrap();
    assert_eq!(value["type"], json!("extract"));
    assert_eq!(value["tool"], json!("extraction.run"));
    assert_eq!(value["inputs"]["schema_id"], json!("general.v1"));
}
