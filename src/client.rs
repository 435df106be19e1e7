use std::sync::Arc;

use reqwest::Request;
use serde::Deserialize;

use crate::error::{ConfigError, RemoteFailure};

/// Returned in place of search results whenever the proxy could not be
/// reached or answered with something unusable.
pub const FALLBACK_MESSAGE: &str = "Error: Unable to fetch search results. Please try again later.";

pub const API_KEY_HEADER: &str = "Kagi-API-Key";
pub const SEARCH_PATH: &str = "/web-search/fastgpt";

const UNKNOWN_STATUS: &str = "unknown status";

/// Tool-call parameters as handed over by the plugin host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub keyword: String,
}

/// Per-user plugin settings. Either field may be absent when the user never
/// filled it in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    #[serde(default, alias = "pluginServer")]
    pub plugin_server_url: Option<String>,
    #[serde(default, rename = "kagiAPIKey")]
    pub api_key: Option<String>,
}

/// A validated search: both credentials present, server URL normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    pub plugin_server_url: String,
    pub api_key: String,
}

impl SearchRequest {
    pub fn new(params: &SearchParams, settings: &UserSettings) -> Result<Self, ConfigError> {
        let api_key = non_empty(settings.api_key.as_deref()).ok_or(ConfigError::MissingApiKey)?;
        let server =
            non_empty(settings.plugin_server_url.as_deref()).ok_or(ConfigError::MissingServerUrl)?;

        Ok(SearchRequest {
            keyword: params.keyword.clone(),
            plugin_server_url: server.strip_suffix('/').unwrap_or(server).to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn url(&self) -> String {
        format!(
            "{}{}?q={}",
            self.plugin_server_url,
            SEARCH_PATH,
            urlencoding::encode(&self.keyword)
        )
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEnvelope {
    response_object: SearchContent,
}

#[derive(Debug, Deserialize)]
struct SearchContent {
    content: String,
}

/// Where the client reports failures it swallowed.
pub trait DiagnosticSink: Send + Sync {
    fn search_failed(&self, request: &SearchRequest, failure: &RemoteFailure);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn search_failed(&self, request: &SearchRequest, failure: &RemoteFailure) {
        tracing::error!(
            server = %request.plugin_server_url,
            keyword = %request.keyword,
            "Error getting search results: {:#}",
            failure
        );
    }
}

pub struct SearchClient {
    http: reqwest::Client,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchClient {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self::with_http_client(reqwest::Client::new(), sink)
    }

    pub fn with_http_client(http: reqwest::Client, sink: Arc<dyn DiagnosticSink>) -> Self {
        SearchClient { http, sink }
    }

    /// Runs one FastGPT search through the plugin server.
    ///
    /// Missing settings come back as `Err`. Anything that goes wrong once the
    /// request is on its way is logged and answered with [`FALLBACK_MESSAGE`].
    pub async fn search(
        &self,
        params: &SearchParams,
        settings: &UserSettings,
    ) -> Result<String, ConfigError> {
        let request = SearchRequest::new(params, settings)?;
        let http_request = self.build(&request)?;

        match self.fetch(http_request).await {
            Ok(content) => Ok(content),
            Err(failure) => {
                self.sink.search_failed(&request, &failure);
                Ok(FALLBACK_MESSAGE.to_string())
            }
        }
    }

    /// Builds the outgoing request. A server URL that does not parse, or a key
    /// that is not a valid header value, fails here before any I/O and counts
    /// as a configuration error.
    fn build(&self, request: &SearchRequest) -> Result<Request, ConfigError> {
        self.http
            .get(request.url())
            .header(API_KEY_HEADER, &request.api_key)
            .build()
            .map_err(|source| ConfigError::InvalidRequest {
                url: request.plugin_server_url.clone(),
                source,
            })
    }

    async fn fetch(&self, request: Request) -> Result<String, RemoteFailure> {
        let response = self
            .http
            .execute(request)
            .await
            .map_err(RemoteFailure::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFailure::Status {
                code: status.as_u16(),
                text: status.canonical_reason().unwrap_or(UNKNOWN_STATUS).to_string(),
            });
        }

        let body = response.text().await.map_err(RemoteFailure::Body)?;
        let envelope: SearchEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.response_object.content)
    }
}
