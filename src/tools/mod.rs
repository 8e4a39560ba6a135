//! Research tools: the agent's hands.
//!
//! A tool is a named capability with a JSON parameter schema and a single
//! async invoke. The registry is built once at startup and shared read-only
//! behind an `Arc` — no mutation after construction.

mod document;
mod search;
mod summarize;

pub use document::{LoadDocumentFromWeb, LoadPdfFromUrl};
pub use search::{SearchPaper, SearchWeb};
pub use summarize::{SummarizeContent, SummarizeContentFromUrls};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::llm::Completer;

/// A named capability with a fixed input/output contract.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool.
    fn name(&self) -> &str;

    /// What this tool does — surfaced to the planner.
    fn description(&self) -> &str;

    /// JSON schema for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the given parameter bundle.
    ///
    /// Planners frequently pass a bare string instead of an object; tools
    /// accept either, treating the string as their single required argument.
    async fn invoke(&self, params: Value) -> anyhow::Result<Value>;
}

/// Immutable name → tool mapping.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// An empty registry — for tests and embedders bringing their own tools.
    pub fn empty() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// The full research toolset. The summarization tools route through the
    /// supplied QA completion channel.
    pub fn research(qa: Arc<dyn Completer>) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(LoadPdfFromUrl));
        registry.register(Arc::new(LoadDocumentFromWeb));
        registry.register(Arc::new(SearchPaper));
        registry.register(Arc::new(SearchWeb));
        registry.register(Arc::new(SummarizeContent::new(Arc::clone(&qa))));
        registry.register(Arc::new(SummarizeContentFromUrls::new(qa)));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Tool names, sorted — used to build the planning prompt.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// ── Parameter helpers shared by the tool impls ───────────────────────────

/// Looks up a string argument by key in an object bundle.
pub(crate) fn str_arg<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(Value::as_str)
}

/// Like [`str_arg`], but a bare-string bundle stands in for the tool's
/// single required argument.
pub(crate) fn primary_arg<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    str_arg(params, key).or_else(|| params.as_str())
}

/// Looks up an optional integer argument by key.
pub(crate) fn u64_arg(params: &Value, key: &str) -> Option<u64> {
    params.get(key).and_then(Value::as_u64)
}

/// Collects a list-of-strings argument: an object key, a bare array, or a
/// single bare string.
pub(crate) fn str_list_arg(params: &Value, key: &str) -> Vec<String> {
    let list = match params {
        Value::Object(map) => map.get(key),
        other => Some(other),
    };
    match list {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}
