use serde::{Deserialize, Serialize};

/// Envelope every plugin route answers with.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse<T> {
    pub success: bool,
    pub message: String,
    pub status_code: u16,
    pub response_object: Option<T>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(message: impl Into<String>, object: T) -> Self {
        ServiceResponse {
            success: true,
            message: message.into(),
            status_code: 200,
            response_object: Some(object),
        }
    }

    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        ServiceResponse {
            success: false,
            message: message.into(),
            status_code,
            response_object: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FastGptResponse {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebPageResponse {
    pub title: String,
    pub content: String,
}
