//! API error types and conversions

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use caption_core::BackendError;
use serde::Serialize;
use serde_json::Value;

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - no `image` file in the request
    MissingPayload(String),
    /// 400 Bad Request - multipart body could not be read
    BadRequest(String),
    /// 413 Payload Too Large - upload exceeds the configured limit
    PayloadTooLarge(String),
    /// 500 Internal Server Error - the upstream call failed
    Upstream {
        message: String,
        details: Option<Value>,
    },
}

/// Error body: `{ "error": ..., "details": ... }`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingPayload(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error, details) = match self {
            ApiError::MissingPayload(msg)
            | ApiError::BadRequest(msg)
            | ApiError::PayloadTooLarge(msg) => (msg, None),
            ApiError::Upstream { message, details } => (message, details),
        };

        // Log errors at appropriate levels
        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                %error,
                has_details = details.is_some(),
                "Relay error"
            );
        } else if status.is_client_error() {
            tracing::debug!(status = status.as_u16(), %error, "Relay client error");
        }

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}

impl From<BackendError> for ApiError {
    fn from(mut err: BackendError) -> Self {
        let details = err.take_details();
        ApiError::Upstream {
            message: err.to_string(),
            details,
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::MissingPayload(format!(
            "Expected multipart/form-data with an 'image' file field: {}",
            rejection.body_text()
        ))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }
}
