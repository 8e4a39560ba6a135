//! Next-step generation: one completion call, best-effort decoding.

use std::sync::Arc;

use serde_json::Value;

use crate::history::truncate_words;
use crate::llm::Completer;
use crate::tools::ToolRegistry;
use crate::types::Step;

pub struct StepPlanner {
    llm: Arc<dyn Completer>,
    max_steps: usize,
    max_history_words: usize,
}

impl StepPlanner {
    pub fn new(llm: Arc<dyn Completer>, max_steps: usize, max_history_words: usize) -> Self {
        Self {
            llm,
            max_steps,
            max_history_words,
        }
    }

    /// Asks the model for the next step. `None` is the completion sentinel:
    /// the model signalled it is finished — and equally, the completion
    /// failed or its output could not be decoded. One attempt, failures
    /// swallowed; the loop terminates as if complete.
    pub async fn generate_next_step(
        &self,
        original_query: &str,
        history: &str,
        step_number: usize,
        tools: &ToolRegistry,
    ) -> Option<Step> {
        let truncated = truncate_words(history, self.max_history_words);
        let prompt = self.build_prompt(original_query, &truncated, step_number, tools);

        let response = match self.llm.complete(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(step_number, error = %err, "planning completion failed, treating as done");
                return None;
            }
        };

        parse_step(&response)
    }

    fn build_prompt(
        &self,
        original_query: &str,
        history: &str,
        step_number: usize,
        tools: &ToolRegistry,
    ) -> String {
        format!(
            r#"You are an AI assistant designed to help researchers. Given a query, the history of previous steps, and the current step number, generate the next step to address the query. Select a tool from the available tools ({tool_names}) or set tool to null if no tool is needed (e.g., for general knowledge questions). Provide parameters for the tool or query execution. Consider the history to avoid redundant steps and ensure progress toward solving the query. If the query appears resolved or no further steps are needed, return an empty step {{}} to indicate completion.

Return the step in the following JSON format:
{{
    "query": "<simple query for this step>",
    "tool": "<tool_name or null>",
    "parameters": "<specific instructions or parameters>"
}}

In case the user is asking a general question, return:
{{
    "query": "<original_query>",
    "tool": "null",
    "parameters": "null"
}}

Original query: {original_query}
History: {history}
Current step number: {step_number}
Maximum steps allowed: {max_steps}"#,
            tool_names = tools.names().join(", "),
            original_query = original_query,
            history = history,
            step_number = step_number,
            max_steps = self.max_steps,
        )
    }
}

/// Strips Markdown code fences wrapping a JSON payload.
fn strip_fences(content: &str) -> &str {
    let mut inner = content.trim();
    if let Some(rest) = inner.strip_prefix("```json") {
        inner = rest.trim_start();
    } else if let Some(rest) = inner.strip_prefix("```") {
        inner = rest.trim_start();
    }
    if let Some(rest) = inner.strip_suffix("```") {
        inner = rest.trim_end();
    }
    inner
}

/// Decodes the planner's textual output into a Step. Any malformation —
/// invalid JSON, a non-object payload, an empty object, a missing query —
/// yields `None`.
fn parse_step(content: &str) -> Option<Step> {
    let payload = strip_fences(content);

    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(error = %err, "failed to decode step JSON, treating as done");
            return None;
        }
    };

    match value.as_object() {
        Some(object) if object.is_empty() => return None,
        Some(_) => {}
        None => {
            tracing::warn!("planner output is not an object, treating as done");
            return None;
        }
    }

    match serde_json::from_value::<Step>(value) {
        Ok(step) => Some(step),
        Err(err) => {
            tracing::warn!(error = %err, "step object malformed, treating as done");
            None
        }
    }
}
