use std::fmt::Write;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://kagi.com/api/v0/fastgpt";

#[derive(Debug, Error)]
pub enum FastGptError {
    #[error("error making API request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("API returned non-200 status: {code} {body}")]
    Status { code: u16, body: String },

    #[error("error decoding response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("failed to render results: {0}")]
    Render(#[from] std::fmt::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FastGptResults {
    #[serde(default)]
    pub meta: FastGptMeta,
    pub data: FastGptData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FastGptMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub node: String,
    #[serde(default)]
    pub ms: i64,
    #[serde(default)]
    pub api_balance: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FastGptData {
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub tokens: i64,
    #[serde(default)]
    pub references: Vec<FastGptReference>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FastGptReference {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Serialize)]
struct FastGptQuery<'a> {
    query: &'a str,
}

/// Client for Kagi's FastGPT endpoint.
#[derive(Debug, Clone)]
pub struct FastGptApi {
    http: reqwest::Client,
    api_url: String,
}

impl FastGptApi {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>) -> Self {
        FastGptApi {
            http,
            api_url: api_url.into(),
        }
    }

    pub async fn query(&self, query: &str, key: &str) -> Result<FastGptResults, FastGptError> {
        let res = self
            .http
            .post(&self.api_url)
            .header(AUTHORIZATION, format!("Bot {key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(&FastGptQuery { query })
            .send()
            .await
            .map_err(FastGptError::Request)?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(FastGptError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let results = res
            .json::<FastGptResults>()
            .await
            .map_err(FastGptError::Decode)?;

        tracing::debug!(
            id = %results.meta.id,
            ms = results.meta.ms,
            tokens = results.data.tokens,
            "fastgpt answered"
        );
        Ok(results)
    }

    /// Queries FastGPT and renders the answer as the plain text handed back to
    /// plugin callers.
    pub async fn answer(&self, query: &str, key: &str) -> Result<String, FastGptError> {
        let results = self.query(query, key).await?;
        Ok(render_results(query, &results)?)
    }
}

/// ```text
/// -----
/// Results for search query "<query>"
/// -----
/// <output>
///
/// References:
/// [1]: <title> (<url>)
/// ```
pub fn render_results(query: &str, results: &FastGptResults) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    write!(
        out,
        "-----\nResults for search query \"{}\"\n-----\n{}\n\nReferences:",
        query, results.data.output
    )?;
    for (i, r) in results.data.references.iter().enumerate() {
        write!(out, "\n[{}]: {} ({})", i + 1, r.title, r.url)?;
    }
    out.push('\n');
    Ok(out)
}
