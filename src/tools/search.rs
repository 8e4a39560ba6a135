//! Academic and web search backed by SerpAPI.
//!
//! Both tools require SERPAPI_API_KEY in the environment.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{primary_arg, str_arg, u64_arg, Tool};

const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";
const DEFAULT_NUM_RESULTS: u64 = 5;

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<SerpOrganicResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SerpOrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    author: String,
}

fn api_key() -> anyhow::Result<String> {
    let key = std::env::var("SERPAPI_API_KEY").unwrap_or_default();
    if key.is_empty() {
        anyhow::bail!("SERPAPI_API_KEY not set in environment");
    }
    Ok(key)
}

async fn serpapi_search(
    key: &str,
    query: &str,
    num: u64,
    extra: &[(&str, String)],
) -> anyhow::Result<SerpResponse> {
    let mut url = format!(
        "{}?q={}&num={}&hl=en&api_key={}",
        SERPAPI_ENDPOINT,
        urlencoding::encode(query),
        num,
        key
    );
    for (name, value) in extra {
        url.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
    }

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("SerpAPI error ({}): {}", status, body);
    }

    Ok(response.json().await?)
}

/// Search for academic papers on arxiv.org and paperswithcode.com.
pub struct SearchPaper;

#[async_trait]
impl Tool for SearchPaper {
    fn name(&self) -> &str {
        "search_paper"
    }

    fn description(&self) -> &str {
        "Search for academic papers (arxiv.org, paperswithcode.com). Supports a recency filter and a publication year range. Returns title, link, snippet and author per paper."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query, e.g. \"LLM safety\""
                },
                "num": {
                    "type": "integer",
                    "description": "Number of results (default: 5)"
                },
                "qdr": {
                    "type": "string",
                    "description": "Recency filter: 'd'=day, 'w'=week, 'm'=month, 'y'=year"
                },
                "as_ylo": {
                    "type": "string",
                    "description": "From year, e.g. '2019'"
                },
                "as_yhi": {
                    "type": "string",
                    "description": "To year, e.g. '2024'"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, params: Value) -> anyhow::Result<Value> {
        let key = api_key()?;
        let query = primary_arg(&params, "query")
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;
        let num = u64_arg(&params, "num").unwrap_or(DEFAULT_NUM_RESULTS);

        let mut extra = Vec::new();
        if let Some(qdr) = str_arg(&params, "qdr") {
            extra.push(("tbs", format!("qdr:{}", qdr)));
        }
        if let Some(from_year) = str_arg(&params, "as_ylo") {
            extra.push(("as_ylo", from_year.to_string()));
        }
        if let Some(to_year) = str_arg(&params, "as_yhi") {
            extra.push(("as_yhi", to_year.to_string()));
        }

        let full_query = format!("{} site:arxiv.org OR site:paperswithcode.com", query);
        let response = serpapi_search(&key, &full_query, num, &extra).await?;

        let papers: Vec<Value> = response
            .organic_results
            .iter()
            .take(num as usize)
            .map(|item| {
                // Paper snippets lead with a label ("Abstract: …"); keep the
                // part after the first colon when one is present.
                let snippet = if item.snippet.contains(':') {
                    item.snippet.split(':').nth(1).unwrap_or_default().to_string()
                } else {
                    item.snippet.clone()
                };
                json!({
                    "title": item.title,
                    "link": item.link,
                    "snippet": snippet,
                    "author": item.author,
                })
            })
            .collect();

        Ok(Value::Array(papers))
    }
}

/// General web search.
pub struct SearchWeb;

#[async_trait]
impl Tool for SearchWeb {
    fn name(&self) -> &str {
        "search_web"
    }

    fn description(&self) -> &str {
        "Search the web. Returns title, link and snippet per result."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "num": {
                    "type": "integer",
                    "description": "Number of results to return (default: 5)"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, params: Value) -> anyhow::Result<Value> {
        let key = api_key()?;
        let query = primary_arg(&params, "query")
            .ok_or_else(|| anyhow::anyhow!("Missing 'query' argument"))?;
        let num = u64_arg(&params, "num").unwrap_or(DEFAULT_NUM_RESULTS);

        let response = serpapi_search(&key, query, num, &[]).await?;

        let results: Vec<Value> = response
            .organic_results
            .iter()
            .take(num as usize)
            .map(|item| {
                json!({
                    "title": item.title,
                    "link": item.link,
                    "snippet": item.snippet,
                })
            })
            .collect();

        Ok(Value::Array(results))
    }
}
