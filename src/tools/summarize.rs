//! Summarization tools routed through the QA completion channel.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{document, primary_arg, str_list_arg, Tool};
use crate::llm::Completer;

/// Produce a short academic summary of a body of text.
pub struct SummarizeContent {
    llm: Arc<dyn Completer>,
}

impl SummarizeContent {
    pub fn new(llm: Arc<dyn Completer>) -> Self {
        Self { llm }
    }

    pub(crate) async fn summarize(&self, content: &str) -> anyhow::Result<String> {
        let prompt = format!(
            "Summarize the following content into a short academic summary:\n\n{}",
            content
        );
        self.llm
            .complete(&prompt)
            .await
            .map_err(|e| anyhow::anyhow!(e))
    }
}

#[async_trait]
impl Tool for SummarizeContent {
    fn name(&self) -> &str {
        "summarize_content"
    }

    fn description(&self) -> &str {
        "Generate a concise academic summary for a given body of text (article, paper, or webpage)."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The full text content to be summarized"
                }
            },
            "required": ["content"]
        })
    }

    async fn invoke(&self, params: Value) -> anyhow::Result<Value> {
        let content = primary_arg(&params, "content")
            .ok_or_else(|| anyhow::anyhow!("Missing 'content' argument"))?;
        Ok(Value::String(self.summarize(content).await?))
    }
}

/// Load and summarize documents directly from a list of URLs: the PDF path
/// for arXiv links, the web path otherwise.
pub struct SummarizeContentFromUrls {
    summarizer: SummarizeContent,
}

impl SummarizeContentFromUrls {
    pub fn new(llm: Arc<dyn Completer>) -> Self {
        Self {
            summarizer: SummarizeContent::new(llm),
        }
    }
}

#[async_trait]
impl Tool for SummarizeContentFromUrls {
    fn name(&self) -> &str {
        "summarize_content_from_urls"
    }

    fn description(&self) -> &str {
        "Summarize academic documents from a list of URLs (arXiv PDFs or web pages) without loading the entire content first. Returns one combined summary string, one block per document."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url_list": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "URLs of papers or articles to summarize"
                }
            },
            "required": ["url_list"]
        })
    }

    async fn invoke(&self, params: Value) -> anyhow::Result<Value> {
        let urls = str_list_arg(&params, "url_list");
        if urls.is_empty() {
            anyhow::bail!("Missing 'url_list' argument");
        }

        let mut combined = String::new();
        for (index, url) in urls.iter().enumerate() {
            let content = if url.to_lowercase().contains("arxiv") {
                document::load_pdf(url).await?
            } else {
                document::load_web(url).await?
            };
            let summary = self.summarizer.summarize(&content).await?;
            combined.push_str(&format!("summary for document {} \n {} \n", index + 1, summary));
        }

        Ok(Value::String(combined.trim().to_string()))
    }
}
