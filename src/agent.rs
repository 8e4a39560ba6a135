//! The plan → execute → record loop.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::events::SessionEvent;
use crate::executor::StepExecutor;
use crate::history::HistoryBuffer;
use crate::planner::StepPlanner;
use crate::tools::ToolRegistry;
use crate::trace::SessionTrace;
use crate::types::{AgentConfig, SessionReport, Step, StepOutcome, StepRecord};

/// A cyclic research agent: processes a query by generating and executing
/// one step at a time, up to `max_steps`, maintaining a bounded history of
/// executed steps.
///
/// One instance serves many queries — all per-query state (history, results,
/// trace, step counter) is local to `process_query`, so concurrent sessions
/// share nothing mutable.
pub struct ResearchAgent {
    planner: StepPlanner,
    executor: StepExecutor,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl ResearchAgent {
    /// Creates a new agent. Prefer [`crate::builder::AgentBuilder`] for
    /// ergonomic construction.
    pub fn new(
        planner: StepPlanner,
        executor: StepExecutor,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            planner,
            executor,
            tools,
            config,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Runs one query to completion. Infallible by design: every planning
    /// or execution fault is degraded to the completion sentinel or to an
    /// error-tagged result, never an escaping error.
    ///
    /// Steps execute strictly sequentially; the observer (when present)
    /// receives a `Planned` event before each execution and a `Completed`
    /// event after it. Send failures on the observer channel are ignored.
    pub async fn process_query(
        &self,
        query: &str,
        observer: Option<&UnboundedSender<SessionEvent>>,
    ) -> SessionReport {
        let mut history = HistoryBuffer::new(self.config.max_history_words);
        let mut results: HashMap<String, StepOutcome> = HashMap::new();
        let mut trace = SessionTrace::new();

        for step_number in 1..=self.config.max_steps {
            let step = self
                .planner
                .generate_next_step(query, history.as_str(), step_number, &self.tools)
                .await;

            if let Some(tx) = observer {
                let _ = tx.send(SessionEvent::Planned {
                    step_number,
                    step: step.clone(),
                });
            }

            let step = match step {
                Some(step) => step,
                None => {
                    trace.record(step_number, "plan", "completion sentinel");
                    tracing::info!(step_number, "query processing complete");
                    break;
                }
            };

            trace.record(
                step_number,
                "plan",
                &format!("query='{}' tool={:?}", step.query, step.tool),
            );
            tracing::info!(step_number, step_query = %step.query, tool = ?step.tool, "executing step");

            let record = self.executor.execute_step(&step, &results).await;

            if let Some(tx) = observer {
                let _ = tx.send(SessionEvent::Completed {
                    step_number,
                    result: record.clone(),
                });
            }

            trace.record(step_number, "execute", &summarize_outcome(&record.outcome));

            history.append(&format_history_entry(step_number, &step, &record));
            results.insert(record.query, record.outcome);
        }

        SessionReport {
            query: query.to_string(),
            results,
            history: history.into_text(),
            trace,
        }
    }
}

/// "Step N: Query: …, Tool: …, Parameters: …, Result: …" — the record shape
/// the planner reads back on later iterations.
fn format_history_entry(step_number: usize, step: &Step, record: &StepRecord) -> String {
    let result_json = serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string());
    format!(
        "Step {}: Query: {}, Tool: {}, Parameters: {}, Result: {}",
        step_number,
        step.query,
        step.tool.as_deref().unwrap_or("null"),
        step.parameters,
        result_json,
    )
}

fn summarize_outcome(outcome: &StepOutcome) -> String {
    match outcome {
        StepOutcome::Result(value) => {
            let text = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            format!("ok: {}", text.chars().take(100).collect::<String>())
        }
        StepOutcome::Error(err) => format!("error: {}", err),
    }
}
