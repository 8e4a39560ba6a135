//! Document loaders: PDF-from-URL and web page text.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{primary_arg, Tool};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; cyclagent/0.1)";

fn http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(std::time::Duration::from_secs(60))
        .build()?)
}

/// Fetches a PDF and returns its extracted text. arXiv abstract URLs are
/// rewritten to their PDF form first.
pub(crate) async fn load_pdf(url: &str) -> anyhow::Result<String> {
    let url = url.replace("abs", "pdf");

    let response = http_client()?.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("Failed to download PDF. Status code: {}", status.as_u16());
    }

    let bytes = response.bytes().await?;
    pdf_extract::extract_text_from_mem(&bytes)
        .map_err(|e| anyhow::anyhow!("Failed to extract PDF text: {}", e))
}

/// Fetches a web page and returns its readable text content.
pub(crate) async fn load_web(url: &str) -> anyhow::Result<String> {
    let response = http_client()?.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("HTTP error: {}", status);
    }

    let body = response.text().await?;
    Ok(extract_text_from_html(&body))
}

/// Downloads a PDF from a direct URL and returns the extracted text.
pub struct LoadPdfFromUrl;

#[async_trait]
impl Tool for LoadPdfFromUrl {
    fn name(&self) -> &str {
        "load_pdf_from_url"
    }

    fn description(&self) -> &str {
        "Download a PDF file from a direct URL (e.g. a link from arXiv or another repository) and return the full text content extracted from it."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The direct URL to the PDF file"
                }
            },
            "required": ["url"]
        })
    }

    async fn invoke(&self, params: Value) -> anyhow::Result<Value> {
        let url =
            primary_arg(&params, "url").ok_or_else(|| anyhow::anyhow!("Missing 'url' argument"))?;
        Ok(Value::String(load_pdf(url).await?))
    }
}

/// Loads the plain text content of a web page.
pub struct LoadDocumentFromWeb;

#[async_trait]
impl Tool for LoadDocumentFromWeb {
    fn name(&self) -> &str {
        "load_document_from_web"
    }

    fn description(&self) -> &str {
        "Load and return the plain text content from a web page URL."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the web page to load"
                }
            },
            "required": ["url"]
        })
    }

    async fn invoke(&self, params: Value) -> anyhow::Result<Value> {
        let url =
            primary_arg(&params, "url").ok_or_else(|| anyhow::anyhow!("Missing 'url' argument"))?;
        Ok(Value::String(load_web(url).await?))
    }
}

fn strip_tag_blocks(mut text: String, open: &str, close: &str) -> String {
    while let Some(start) = text.find(open) {
        match text[start..].find(close) {
            Some(end) => text.replace_range(start..start + end + close.len(), ""),
            None => break,
        }
    }
    text
}

/// Extract readable text from HTML (simple approach: drop script/style
/// blocks, strip tags, collapse whitespace, decode common entities).
pub(crate) fn extract_text_from_html(html: &str) -> String {
    let text = strip_tag_blocks(html.to_string(), "<script", "</script>");
    let text = strip_tag_blocks(text, "<style", "</style>");

    let mut stripped = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                stripped.push(' ');
            }
            _ if !in_tag => stripped.push(c),
            _ => {}
        }
    }

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    html_decode(&collapsed)
}

/// Basic HTML entity decoding.
pub(crate) fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}
