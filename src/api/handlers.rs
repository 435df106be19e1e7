use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;

use crate::client::API_KEY_HEADER;
use crate::reader::PageContent;

use super::AppState;
use super::models::{FastGptResponse, ServiceResponse, WebPageResponse};

type Reply<T> = (StatusCode, Json<ServiceResponse<T>>);

/// Query string as raw pairs, so repeated keys never fail extraction.
type QueryPairs = Query<Vec<(String, String)>>;

/// First value given for `key`; an empty first value counts as missing.
fn first_param(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .filter(|v| !v.is_empty())
}

fn failure<T>(status: StatusCode, message: impl Into<String>) -> Reply<T> {
    (
        status,
        Json(ServiceResponse::failure(status.as_u16(), message)),
    )
}

fn success<T>(message: &str, object: T) -> Reply<T> {
    (StatusCode::OK, Json(ServiceResponse::ok(message, object)))
}

pub async fn fastgpt_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): QueryPairs,
    headers: HeaderMap,
) -> Reply<FastGptResponse> {
    let Some(q) = first_param(&pairs, "q") else {
        return failure(StatusCode::BAD_REQUEST, "`q` query parameter missing");
    };

    let key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|k| !k.is_empty());
    let Some(key) = key else {
        return failure(
            StatusCode::BAD_REQUEST,
            format!("`{API_KEY_HEADER}` header missing"),
        );
    };

    match state.fastgpt.answer(&q, key).await {
        Ok(content) => success("Content fetched successfully", FastGptResponse { content }),
        Err(e) => {
            tracing::error!(query = %q, "fastgpt request failed: {:#}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub async fn web_page_handler(
    State(state): State<Arc<AppState>>,
    Query(pairs): QueryPairs,
) -> Reply<WebPageResponse> {
    let Some(url) = first_param(&pairs, "url") else {
        return failure(StatusCode::BAD_REQUEST, "`url` query parameter missing");
    };

    match state.reader.read(&url).await {
        Ok(PageContent::Readable { title, content }) | Ok(PageContent::Html { title, content }) => {
            success(
                "Content fetched successfully",
                WebPageResponse { title, content },
            )
        }
        Ok(PageContent::FullPage { body }) => success(
            "Content fetched successfully (fallback to full page)",
            WebPageResponse {
                title: String::new(),
                content: body,
            },
        ),
        Err(e) => {
            tracing::error!(url = %url, "web page read failed: {:#}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
