//! Scripted end-to-end run: a mock planner drives one tool-less step and
//! then signals completion. No network, no API keys.
//!
//! Run with: cargo run --example mock_research

use std::sync::Arc;

use cyclagent::llm::MockCompleter;
use cyclagent::AgentBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let planning = Arc::new(MockCompleter::replies([
        r#"{"query": "What is retrieval-augmented generation?", "tool": null, "parameters": null}"#,
        "{}",
    ]));
    let qa = Arc::new(MockCompleter::replies([
        "Retrieval-augmented generation grounds model answers in documents fetched at query time.",
    ]));

    let agent = AgentBuilder::new()
        .planning_llm(planning)
        .qa_llm(qa)
        .without_research_tools()
        .build()?;

    let report = agent
        .process_query("Explain retrieval-augmented generation.", None)
        .await;

    println!("query:   {}", report.query);
    println!("results: {}", serde_json::to_string_pretty(&report.results)?);
    println!("history: {}", report.history);
    println!("\ntrace:\n{}", report.trace.to_json());

    Ok(())
}
