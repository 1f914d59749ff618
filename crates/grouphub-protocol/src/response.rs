//! The response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use grouphub_core::error::{AppError, ErrorKind};

/// One response line.
///
/// Every request, malformed ones included, is answered with this envelope:
/// a numeric status, a machine-readable code, a human message, and a
/// payload object (empty on pure side-effect success).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Numeric status: 200/201 success, 4xx caller fault, 500 internal.
    pub status: u16,
    /// Machine-readable code, `SUCCESS_*` or `ERROR_*`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Command-specific payload.
    pub payload: Value,
}

impl Response {
    /// A 200 success.
    pub fn ok(code: &str, message: impl Into<String>, payload: Value) -> Self {
        Self {
            status: 200,
            code: code.to_string(),
            message: message.into(),
            payload,
        }
    }

    /// A 201 success for operations that created a resource.
    pub fn created(code: &str, message: impl Into<String>, payload: Value) -> Self {
        Self {
            status: 201,
            code: code.to_string(),
            message: message.into(),
            payload,
        }
    }

    /// A 400 for requests that failed parsing or field validation.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            code: "ERROR_INVALID_REQUEST".to_string(),
            message: message.into(),
            payload: json!({}),
        }
    }

    /// Whether this is a success response.
    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

impl From<AppError> for Response {
    fn from(err: AppError) -> Self {
        let (status, code) = match err.kind {
            ErrorKind::Validation => (400, "ERROR_INVALID_REQUEST"),
            ErrorKind::Authentication => (401, "ERROR_UNAUTHORIZED"),
            ErrorKind::Authorization => (403, "ERROR_FORBIDDEN"),
            ErrorKind::NotFound => (404, "ERROR_NOT_FOUND"),
            ErrorKind::Conflict => (409, "ERROR_CONFLICT"),
            ErrorKind::Internal
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization => (500, "ERROR_INTERNAL_SERVER"),
        };
        let message = if status == 500 {
            // Store and serialization details stay in the logs.
            "Internal server error".to_string()
        } else {
            err.message.clone()
        };
        Self {
            status,
            code: code.to_string(),
            message,
            payload: json!({}),
        }
    }
}
