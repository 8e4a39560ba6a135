use async_trait::async_trait;

mod gemini;
mod mock;
mod openai;

pub use gemini::{GeminiCompleter, DEFAULT_GEMINI_MODEL};
pub use mock::MockCompleter;
pub use openai::OpenAiCompleter;

/// The single seam between the loop and any language-model provider.
///
/// # Contract
/// - Must be Send + Sync (shared behind `Arc<dyn Completer>`)
/// - One prompt in, one completion text out — no streaming, no retries
/// - Returns Err(String) ONLY for failed interactions:
///   - Network or authentication failure
///   - Provider payload with no usable text
/// - The caller decides how to recover; the planner maps any failure to
///   the completion sentinel, the executor to an error-tagged result
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, String>;
}
