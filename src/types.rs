use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::trace::SessionTrace;

/// One planned unit of work: a sub-query, an optional tool, and the
/// parameters to run it with.
///
/// `tool = None` means "answer `query` directly from general knowledge".
/// Planners frequently emit the string literal `"null"` instead of a JSON
/// null; [`crate::executor::StepExecutor`] normalizes that before dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub query: String,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl Step {
    /// A step answered directly from general knowledge, no tool.
    pub fn direct(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            tool: None,
            parameters: serde_json::Value::Null,
        }
    }

    /// A step routed through a named tool.
    pub fn with_tool(
        query: impl Into<String>,
        tool: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            query: query.into(),
            tool: Some(tool.into()),
            parameters,
        }
    }
}

/// What a single step produced. Exactly one variant is ever present,
/// serialized externally tagged: `{"result": …}` or `{"error": …}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome {
    #[serde(rename = "result")]
    Result(serde_json::Value),
    #[serde(rename = "error")]
    Error(String),
}

impl StepOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, StepOutcome::Error(_))
    }

    /// The result payload as text, when it is one.
    pub fn text(&self) -> Option<&str> {
        match self {
            StepOutcome::Result(value) => value.as_str(),
            StepOutcome::Error(_) => None,
        }
    }
}

/// A completed step keyed by its sub-query. Serializes as the one-entry
/// mapping `{"<query>": {"result"|"error": …}}` — the per-step result shape
/// the observer channel carries.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub query: String,
    pub outcome: StepOutcome,
}

impl Serialize for StepRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.query, &self.outcome)?;
        map.end()
    }
}

/// Everything one query's session produced. The session owns no state beyond
/// this value; nothing survives the call that returned it.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub query: String,
    /// Keyed by step query text. Two steps sharing identical query text
    /// overwrite each other; the last write wins.
    pub results: HashMap<String, StepOutcome>,
    pub history: String,
    /// Stage-by-stage log of the session. Not part of the session payload.
    #[serde(skip)]
    pub trace: SessionTrace,
}

/// Tuning knobs for the loop. Defaults mirror the reference deployment:
/// ten steps, five thousand words of history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Hard cap on planning/execution cycles per query.
    pub max_steps: usize,

    /// Word-count ceiling on the history log fed back to the planner.
    pub max_history_words: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            max_history_words: 5000,
        }
    }
}
