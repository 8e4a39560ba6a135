//! Step execution: tool dispatch or general-knowledge completion.

use std::collections::HashMap;
use std::sync::Arc;

use crate::llm::Completer;
use crate::tools::ToolRegistry;
use crate::types::{Step, StepOutcome, StepRecord};

pub struct StepExecutor {
    tools: Arc<ToolRegistry>,
    qa: Arc<dyn Completer>,
}

impl StepExecutor {
    pub fn new(tools: Arc<ToolRegistry>, qa: Arc<dyn Completer>) -> Self {
        Self { tools, qa }
    }

    /// Executes one step. Every failure is captured as a tagged `Error`
    /// outcome keyed by the step's query; nothing propagates.
    ///
    /// `previous_results` is a dependency-resolution hook for future tools;
    /// the current toolset reads prior results only through the history
    /// text fed to the planner.
    pub async fn execute_step(
        &self,
        step: &Step,
        _previous_results: &HashMap<String, StepOutcome>,
    ) -> StepRecord {
        // The planner sometimes emits the string literal "null" for "no tool".
        let tool_name = step.tool.as_deref().filter(|name| *name != "null");

        let outcome = match tool_name {
            Some(name) => match self.tools.get(name) {
                Some(tool) => {
                    tracing::debug!(tool = name, "invoking tool");
                    match tool.invoke(step.parameters.clone()).await {
                        Ok(value) => StepOutcome::Result(value),
                        Err(err) => StepOutcome::Error(err.to_string()),
                    }
                }
                None => StepOutcome::Error(format!("Tool {} not found", name)),
            },
            None => match self.qa.complete(&step.query).await {
                Ok(text) => StepOutcome::Result(serde_json::Value::String(text)),
                Err(err) => StepOutcome::Error(err),
            },
        };

        if let StepOutcome::Error(err) = &outcome {
            tracing::warn!(query = %step.query, error = %err, "step failed");
        }

        StepRecord {
            query: step.query.clone(),
            outcome,
        }
    }
}
