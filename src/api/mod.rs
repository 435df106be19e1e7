use axum::{Router, http::Method, routing::get};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{Config, PluginsConfig};
use crate::fastgpt::FastGptApi;
use crate::reader::PageReader;

pub mod handlers;
pub mod models;

pub struct AppState {
    pub fastgpt: FastGptApi,
    pub reader: PageReader,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let http = reqwest::Client::new();
        AppState {
            fastgpt: FastGptApi::new(http.clone(), config.kagi_api_url.clone()),
            reader: PageReader::new(http),
        }
    }
}

pub fn create_router(state: Arc<AppState>, plugins: &PluginsConfig) -> Router {
    let origins = if plugins.allow_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(plugins.allow_origins.clone())
    };

    // The search plugin sends its key in a custom header, so preflights
    // must accept arbitrary request headers.
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let routes = Router::new()
        .route("/web-page-reader/get-content", get(handlers::web_page_handler))
        .route("/web-search/fastgpt", get(handlers::fastgpt_handler))
        .with_state(state);

    let router = if plugins.prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&format!("/{}", plugins.prefix), routes)
    };

    router.layer(cors)
}
