//! Common error types for caption backends

use serde_json::Value;
use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur while forwarding an image upstream
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response (DNS, connect, TLS, reset)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The HTTP client gave up waiting for the upstream
    #[error("Upstream request timed out")]
    Timeout,

    /// The upstream answered with a non-2xx status
    #[error("Upstream returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the upstream
        status: u16,
        /// Upstream error payload, if the response carried one
        details: Option<Value>,
    },

    /// The upstream answered 2xx but the body is not JSON
    #[error("Malformed upstream response: {reason}")]
    MalformedResponse {
        /// Parser message
        reason: String,
        /// The raw body, as text
        details: Option<Value>,
    },

    /// Internal error (client construction and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Upstream payload attached to this error, if any
    pub fn details(&self) -> Option<&Value> {
        match self {
            BackendError::Status { details, .. } => details.as_ref(),
            BackendError::MalformedResponse { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Detach the upstream payload from this error
    pub fn take_details(&mut self) -> Option<Value> {
        match self {
            BackendError::Status { details, .. } => details.take(),
            BackendError::MalformedResponse { details, .. } => details.take(),
            _ => None,
        }
    }

    /// Build the payload carried alongside an upstream error.
    ///
    /// JSON bodies are kept as JSON, anything else is kept as a string.
    /// Empty (or whitespace-only) bodies carry no payload.
    pub fn details_from_body(body: &[u8]) -> Option<Value> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return None;
        }
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Some(value),
            Err(_) => Some(Value::String(String::from_utf8_lossy(body).into_owned())),
        }
    }
}
