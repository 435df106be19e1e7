use axum::http::HeaderValue;
use dotenvy::dotenv;
use std::env;
use thiserror::Error;

use crate::fastgpt::DEFAULT_API_URL;

const DEFAULT_ADDRESS: &str = "0.0.0.0:8081";

#[derive(Debug, Error)]
pub enum ProxyConfigError {
    #[error("failed to read prefix file {path}: {source}")]
    PrefixFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CORS origin {0:?}")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub address: String,
    pub plugins: PluginsConfig,
    pub kagi_api_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct PluginsConfig {
    pub prefix: String,
    /// Empty means every origin is allowed.
    pub allow_origins: Vec<HeaderValue>,
}

impl Config {
    /// Loads the proxy configuration from the process environment, reading a
    /// `.env` file first if one is present.
    pub fn from_env() -> Result<Config, ProxyConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Config, ProxyConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or_default =
            |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let mut prefix = get_or_default("PLUGINS_PREFIX", "");
        if let Some(path) = get("PLUGINS_PREFIX_FILE").filter(|p| !p.is_empty()) {
            prefix = std::fs::read_to_string(&path)
                .map_err(|source| ProxyConfigError::PrefixFile { path, source })?;
        }

        let allow_origins = get_or_default("PLUGINS_CORS_ALLOW_ORIGINS", "")
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                HeaderValue::from_str(o).map_err(|_| ProxyConfigError::InvalidOrigin(o.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let address = get("ADDRESS")
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

        Ok(Config {
            address,
            plugins: PluginsConfig {
                prefix: prefix.trim().trim_matches('/').to_string(),
                allow_origins,
            },
            kagi_api_url: get_or_default("KAGI_API_URL", DEFAULT_API_URL),
        })
    }
}
