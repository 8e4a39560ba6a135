//! Live research run against the Gemini API, streaming session events.
//!
//! Requires GOOGLE_API_KEY (and SERPAPI_API_KEY for the search tools).
//! Run with: cargo run --example gemini_research

use std::sync::Arc;

use cyclagent::llm::{Completer, GeminiCompleter};
use cyclagent::AgentBuilder;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let planning: Arc<dyn Completer> =
        Arc::new(GeminiCompleter::from_env()?.with_temperature(0.1));
    let qa: Arc<dyn Completer> = Arc::new(GeminiCompleter::from_env()?.with_temperature(0.8));

    let agent = AgentBuilder::new()
        .planning_llm(planning)
        .qa_llm(qa)
        .build()?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("{}", serde_json::to_string(&event).unwrap_or_default());
        }
    });

    let report = agent
        .process_query(
            "Summarize the latest 3 papers on image classification.",
            Some(&tx),
        )
        .await;
    drop(tx);
    printer.await?;

    println!(
        "\nfinal results:\n{}",
        serde_json::to_string_pretty(&report.results)?
    );

    Ok(())
}
