//! Uniform response envelope and error mapping
//!
//! Every response body is `{success, message, timestamp, data?}`.
//! Expected store failures map to 4xx; anything unexpected becomes a
//! generic 500 with no internal detail in the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: Utc::now().to_rfc3339(),
            data: None,
        }
    }

    pub fn with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok(message)
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::ok(message)
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(&'static str),
    Forbidden,
    NotFound(String),
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Unauthorized(message) => (*message).to_string(),
            ApiError::Forbidden => "Admin access required".to_string(),
            ApiError::NotFound(message) => message.clone(),
            ApiError::Internal => "Internal server error".to_string(),
        }
    }
}

impl From<arcadia_core::Error> for ApiError {
    fn from(err: arcadia_core::Error) -> Self {
        use arcadia_core::Error;
        match err {
            Error::InvalidInput { .. } | Error::Duplicate(_) | Error::Constraint(_) => {
                ApiError::BadRequest(err.to_string())
            }
            Error::NotFound(_) => ApiError::NotFound(err.to_string()),
            other => {
                tracing::error!(error = %other, "Storage failure");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(Envelope::error(self.message()))).into_response()
    }
}
