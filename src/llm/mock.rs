use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::Completer;

/// Scripted completion backend for tests and demos.
///
/// Responses are consumed front to back; once the queue is exhausted every
/// further call fails, which the planner maps to the completion sentinel.
pub struct MockCompleter {
    responses: Mutex<Vec<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockCompleter {
    pub fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Convenience: a queue of plain successful completions.
    pub fn replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Ok(r.into())).collect())
    }

    /// Returns the number of times complete() was invoked.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Returns the prompt passed to the Nth call (0-indexed).
    pub fn prompt_for_call(&self, n: usize) -> Option<String> {
        self.prompts.lock().unwrap().get(n).cloned()
    }
}

#[async_trait]
impl Completer for MockCompleter {
    async fn complete(&self, prompt: &str) -> Result<String, String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err("MockCompleter: no more programmed responses".to_string());
        }
        responses.remove(0)
    }
}
