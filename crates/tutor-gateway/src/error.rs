use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

/// Body returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug)]
pub enum ApiError {
    /// Body is not valid JSON or does not match the request schema.
    InvalidBody(String),
    /// Body parsed but failed request validation.
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorResponse {
        let status = self.status_code();
        match self {
            ApiError::InvalidBody(detail) => ErrorResponse {
                error: "Request body does not match the expected schema".to_string(),
                error_code: format!("HTTP_{}", status.as_u16()),
                details: Some(Value::String(detail.clone())),
                suggestions: vec![
                    "Check your request parameters".to_string(),
                    "Send message, user_info and optional chat_history as JSON".to_string(),
                ],
            },
            ApiError::BadRequest(message) => ErrorResponse {
                error: message.clone(),
                error_code: format!("HTTP_{}", status.as_u16()),
                details: None,
                suggestions: vec!["Check your request parameters".to_string()],
            },
            ApiError::Internal(_) => ErrorResponse {
                error: "Internal server error".to_string(),
                error_code: "INTERNAL_ERROR".to_string(),
                details: None,
                suggestions: vec![
                    "This is an unexpected error".to_string(),
                    "Please check server logs".to_string(),
                ],
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<tutor_common::Error> for ApiError {
    fn from(err: tutor_common::Error) -> Self {
        match err {
            tutor_common::Error::Validation(message) => ApiError::BadRequest(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Internal(detail) => error!(status = status.as_u16(), "request failed: {}", detail),
            ApiError::InvalidBody(detail) | ApiError::BadRequest(detail) => {
                warn!(status = status.as_u16(), "rejected request: {}", detail)
            }
        }
        (status, Json(self.body())).into_response()
    }
}
