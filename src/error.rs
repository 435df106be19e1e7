use thiserror::Error;

/// Setup mistakes the caller has to fix. These are returned as-is and never
/// turned into the fallback string.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not set. Please set the API Key in the plugin settings.")]
    MissingApiKey,

    #[error("missing plugin server URL. Please set it in the plugin settings.")]
    MissingServerUrl,

    #[error("cannot build a request for plugin server {url:?}: {source}")]
    InvalidRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Failures of the request itself. The client logs these and answers with
/// [`crate::client::FALLBACK_MESSAGE`].
#[derive(Debug, Error)]
pub enum RemoteFailure {
    #[error("error making search request: {0}")]
    Network(#[source] reqwest::Error),

    /// `text` is the canonical reason phrase, or "unknown status" for codes
    /// without one.
    #[error("Failed to fetch search results: {code} - {text}")]
    Status { code: u16, text: String },

    #[error("error reading response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}
