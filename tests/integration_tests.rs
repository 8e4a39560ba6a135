//! End-to-end loop tests for cyclagent.
//!
//! All sessions are driven by `MockCompleter` — no network calls are made.
//! Run with: `cargo test`

use std::sync::Arc;

use async_trait::async_trait;
use cyclagent::llm::MockCompleter;
use cyclagent::{AgentBuilder, ResearchAgent, SessionEvent, StepOutcome, StepRecord, Tool};
use serde_json::{json, Value};
use tokio::sync::mpsc;

// ─────────────────────────────────────────────────────────────────────────────
// Test helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Always fails with a rate-limit message.
struct RateLimitedTool;

#[async_trait]
impl Tool for RateLimitedTool {
    fn name(&self) -> &str {
        "flaky_search"
    }
    fn description(&self) -> &str {
        "A search tool that is currently rate limited"
    }
    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }
    async fn invoke(&self, _params: Value) -> anyhow::Result<Value> {
        anyhow::bail!("rate limited")
    }
}

fn agent_with(planning: Arc<MockCompleter>, qa: Arc<MockCompleter>) -> ResearchAgent {
    AgentBuilder::new()
        .planning_llm(planning)
        .qa_llm(qa)
        .without_research_tools()
        .build()
        .expect("builder should succeed")
}

/// Runs a session with an observer and returns (report, captured events).
async fn run_with_events(
    agent: &ResearchAgent,
    query: &str,
) -> (cyclagent::SessionReport, Vec<SessionEvent>) {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = agent.process_query(query, Some(&tx)).await;
    drop(tx);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    (report, events)
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario A: planner signals completion on step 1
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_empty_plan_on_step_one_ends_the_session() {
    let planning = Arc::new(MockCompleter::replies(["{}"]));
    let qa = Arc::new(MockCompleter::new(Vec::new()));
    let agent = agent_with(planning.clone(), qa.clone());

    let (report, events) = run_with_events(&agent, "anything").await;

    assert_eq!(events.len(), 1, "exactly one event: the sentinel step");
    match &events[0] {
        SessionEvent::Planned { step_number, step } => {
            assert_eq!(*step_number, 1);
            assert!(step.is_none(), "the sentinel is a null step");
        }
        other => panic!("expected a Planned event, got: {:?}", other),
    }

    assert!(report.results.is_empty());
    assert_eq!(report.history, "");
    assert_eq!(planning.call_count(), 1);
    assert_eq!(qa.call_count(), 0, "nothing must execute after the sentinel");
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario B: one direct step, then the sentinel
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_single_direct_step_then_sentinel() {
    let planning = Arc::new(MockCompleter::replies([
        r#"{"query": "Q1", "tool": null, "parameters": null}"#,
        "{}",
    ]));
    let qa = Arc::new(MockCompleter::replies(["the QA answer"]));
    let agent = agent_with(planning.clone(), qa);

    let report = agent.process_query("original", None).await;

    assert_eq!(report.query, "original");
    assert_eq!(report.results.len(), 1);
    assert_eq!(
        report.results.get("Q1"),
        Some(&StepOutcome::Result(Value::String("the QA answer".to_string())))
    );
    assert!(
        report.history.starts_with("Step 1: Query: Q1, Tool: null, Parameters: null,"),
        "history must contain one Step 1 record, got: {}",
        report.history
    );
    assert!(report.history.contains("the QA answer"));
    assert_eq!(planning.call_count(), 2, "step 1 plus the sentinel round");
}

// ─────────────────────────────────────────────────────────────────────────────
// Scenario C: a tool failure does not stop the loop
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tool_failure_continues_to_next_step() {
    let planning = Arc::new(MockCompleter::replies([
        r#"{"query": "find it", "tool": "flaky_search", "parameters": "anything"}"#,
        "{}",
    ]));
    let qa = Arc::new(MockCompleter::new(Vec::new()));
    let agent = AgentBuilder::new()
        .planning_llm(planning.clone())
        .qa_llm(qa)
        .without_research_tools()
        .tool(Arc::new(RateLimitedTool))
        .build()
        .expect("builder should succeed");

    let report = agent.process_query("original", None).await;

    assert_eq!(
        report.results.get("find it"),
        Some(&StepOutcome::Error("rate limited".to_string()))
    );
    // The loop went back to the planner for step 2 rather than stopping.
    assert_eq!(planning.call_count(), 2);
    assert!(report.history.contains("rate limited"));
}

// ─────────────────────────────────────────────────────────────────────────────
// The step budget is a hard cap
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_loop_never_exceeds_max_steps() {
    // A planner that always wants another step.
    let plans: Vec<Result<String, String>> = (0..50)
        .map(|i| {
            Ok(format!(
                r#"{{"query": "step {}", "tool": null, "parameters": null}}"#,
                i
            ))
        })
        .collect();
    let answers: Vec<Result<String, String>> =
        (0..50).map(|i| Ok(format!("answer {}", i))).collect();

    let planning = Arc::new(MockCompleter::new(plans));
    let qa = Arc::new(MockCompleter::new(answers));
    let agent = agent_with(planning.clone(), qa);

    let report = agent.process_query("never ending", None).await;

    assert_eq!(planning.call_count(), 10, "default budget is 10 steps");
    assert_eq!(report.results.len(), 10);
}

#[tokio::test]
async fn test_custom_step_budget_is_respected() {
    let plans: Vec<Result<String, String>> = (0..10)
        .map(|i| Ok(format!(r#"{{"query": "s{}", "tool": null, "parameters": null}}"#, i)))
        .collect();
    let answers: Vec<Result<String, String>> = (0..10).map(|i| Ok(format!("a{}", i))).collect();

    let planning = Arc::new(MockCompleter::new(plans));
    let agent = AgentBuilder::new()
        .planning_llm(planning.clone())
        .qa_llm(Arc::new(MockCompleter::new(answers)))
        .without_research_tools()
        .max_steps(3)
        .build()
        .expect("builder should succeed");

    let report = agent.process_query("q", None).await;

    assert_eq!(planning.call_count(), 3);
    assert_eq!(report.results.len(), 3);
}

// ─────────────────────────────────────────────────────────────────────────────
// Result-map semantics: identical query text overwrites
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_identical_step_queries_overwrite_in_the_results_map() {
    let planning = Arc::new(MockCompleter::replies([
        r#"{"query": "Q", "tool": null, "parameters": null}"#,
        r#"{"query": "Q", "tool": null, "parameters": null}"#,
        "{}",
    ]));
    let qa = Arc::new(MockCompleter::replies(["first", "second"]));
    let agent = agent_with(planning, qa);

    let report = agent.process_query("original", None).await;

    assert_eq!(report.results.len(), 1, "later writes overwrite by query key");
    assert_eq!(
        report.results.get("Q"),
        Some(&StepOutcome::Result(Value::String("second".to_string())))
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Unknown tool end-to-end: error entry, loop continues
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unknown_tool_records_error_and_continues() {
    let planning = Arc::new(MockCompleter::replies([
        r#"{"query": "q", "tool": "missing_tool", "parameters": "p"}"#,
        "{}",
    ]));
    let agent = agent_with(planning.clone(), Arc::new(MockCompleter::new(Vec::new())));

    let report = agent.process_query("original", None).await;

    assert_eq!(
        report.results.get("q"),
        Some(&StepOutcome::Error("Tool missing_tool not found".to_string()))
    );
    assert_eq!(planning.call_count(), 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Event cadence: Planned then Completed, per iteration, sentinel last
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_events_alternate_planned_then_completed() {
    let planning = Arc::new(MockCompleter::replies([
        r#"{"query": "Q1", "tool": null, "parameters": null}"#,
        r#"{"query": "Q2", "tool": null, "parameters": null}"#,
        "{}",
    ]));
    let qa = Arc::new(MockCompleter::replies(["A1", "A2"]));
    let agent = agent_with(planning, qa);

    let (_report, events) = run_with_events(&agent, "original").await;

    assert_eq!(events.len(), 5);
    assert!(matches!(
        &events[0],
        SessionEvent::Planned { step_number: 1, step: Some(_) }
    ));
    assert!(matches!(
        &events[1],
        SessionEvent::Completed { step_number: 1, .. }
    ));
    assert!(matches!(
        &events[2],
        SessionEvent::Planned { step_number: 2, step: Some(_) }
    ));
    assert!(matches!(
        &events[3],
        SessionEvent::Completed { step_number: 2, .. }
    ));
    assert!(matches!(
        &events[4],
        SessionEvent::Planned { step_number: 3, step: None }
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// History stays bounded inside the loop
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_history_is_bounded_across_steps() {
    let plans: Vec<Result<String, String>> = (0..10)
        .map(|i| Ok(format!(r#"{{"query": "s{}", "tool": null, "parameters": null}}"#, i)))
        .collect();
    let answers: Vec<Result<String, String>> =
        (0..10).map(|i| Ok(format!("answer number {}", i))).collect();

    let agent = AgentBuilder::new()
        .planning_llm(Arc::new(MockCompleter::new(plans)))
        .qa_llm(Arc::new(MockCompleter::new(answers)))
        .without_research_tools()
        .max_history_words(12)
        .build()
        .expect("builder should succeed");

    let report = agent.process_query("q", None).await;

    assert!(
        report.history.split_whitespace().count() <= 12,
        "history must respect the word ceiling, got: {}",
        report.history
    );
    assert!(report.history.contains("s9"), "newest record must survive");
}

// ─────────────────────────────────────────────────────────────────────────────
// Session trace records plan and execute stages
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_trace_records_plan_and_execute_stages() {
    let planning = Arc::new(MockCompleter::replies([
        r#"{"query": "Q1", "tool": null, "parameters": null}"#,
        "{}",
    ]));
    let qa = Arc::new(MockCompleter::replies(["A1"]));
    let agent = agent_with(planning, qa);

    let report = agent.process_query("original", None).await;

    assert_eq!(
        report.trace.for_stage("plan").len(),
        2,
        "one planned step plus the sentinel"
    );
    assert_eq!(report.trace.for_stage("execute").len(), 1);
    assert!(!report.trace.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Builder validation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_builder_requires_both_completion_channels() {
    // Use err() instead of unwrap_err() — avoids requiring ResearchAgent: Debug
    let err = AgentBuilder::new().build().err().expect("build must fail");
    assert!(err.to_string().contains("planning"), "got: {}", err);

    let err = AgentBuilder::new()
        .planning_llm(Arc::new(MockCompleter::new(Vec::new())))
        .build()
        .err()
        .expect("build must fail without a QA channel");
    assert!(err.to_string().contains("QA"), "got: {}", err);
}

#[test]
fn test_research_toolset_registers_the_six_tools() {
    let agent = AgentBuilder::new()
        .llm(Arc::new(MockCompleter::new(Vec::new())))
        .build()
        .expect("builder should succeed");

    let tools = agent.tools();
    assert_eq!(tools.len(), 6);
    for name in [
        "load_pdf_from_url",
        "load_document_from_web",
        "search_paper",
        "search_web",
        "summarize_content",
        "summarize_content_from_urls",
    ] {
        assert!(tools.has(name), "missing tool: {}", name);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire shapes of the observer events
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_event_wire_shapes_match_the_protocol() {
    let planned = SessionEvent::Planned {
        step_number: 1,
        step: None,
    };
    assert_eq!(
        serde_json::to_value(&planned).unwrap(),
        json!({"step_number": 1, "step": null})
    );

    let completed = SessionEvent::Completed {
        step_number: 2,
        result: StepRecord {
            query: "q".to_string(),
            outcome: StepOutcome::Result(Value::String("x".to_string())),
        },
    };
    assert_eq!(
        serde_json::to_value(&completed).unwrap(),
        json!({"step_number": 2, "result": {"q": {"result": "x"}}})
    );

    assert_eq!(
        serde_json::to_value(SessionEvent::done()).unwrap(),
        json!({"status": "done"})
    );
    assert_eq!(
        serde_json::to_value(SessionEvent::failed("boom")).unwrap(),
        json!({"error": "boom"})
    );
}
