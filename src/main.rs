use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cyclagent::llm::{Completer, GeminiCompleter};
use cyclagent::AgentBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cyclagent=debug")),
        )
        .init();

    // Two channels on the same model: deterministic planning, freer QA.
    let planning: Arc<dyn Completer> = Arc::new(
        GeminiCompleter::from_env()
            .map_err(anyhow::Error::msg)?
            .with_temperature(0.1),
    );
    let qa: Arc<dyn Completer> = Arc::new(
        GeminiCompleter::from_env()
            .map_err(anyhow::Error::msg)?
            .with_temperature(0.8),
    );

    let agent = AgentBuilder::new()
        .planning_llm(planning)
        .qa_llm(qa)
        .build()?;

    let addr = std::env::var("CYCLAGENT_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let app = cyclagent::server::router(Arc::new(agent));

    tracing::info!(%addr, "cyclagent server listening");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
