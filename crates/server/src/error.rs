//! Error responses for the HTTP surface.
//!
//! Every failure is rendered as `{"error": <message>, "code": <status>}`.
//! Messages are fixed per operation; engine detail is logged, never sent.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use mnemo_core::Error;
use serde::Serialize;

/// The operation a request was performing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Write,
    Read,
    Query,
    Purge,
    Health,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::Write => "Memory storage error",
            Operation::Read => "Memory retrieval error",
            Operation::Query => "Memory query error",
            Operation::Purge => "Memory purge error",
            Operation::Health => "Internal server error",
        }
    }
}

/// JSON error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Error returned by handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: Option<&'static str>,
}

impl ApiError {
    /// Map an engine error for the given operation
    pub fn engine(op: Operation, err: Error) -> Self {
        match err {
            Error::InvalidProject(_) => Self::new(StatusCode::BAD_REQUEST, "Invalid project ID"),
            Error::ConfirmationRequired => Self {
                status: StatusCode::BAD_REQUEST,
                error: "Confirmation required",
                message: Some("Set confirm=true to purge all memory data"),
            },
            other => {
                tracing::error!(operation = ?op, error = %other, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, op.failure_message())
            }
        }
    }

    /// Missing or wrong `X-API-KEY`
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Invalid API key")
    }

    /// Anything unexpected, such as a panicked engine call
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    fn new(status: StatusCode, error: &'static str) -> Self {
        Self {
            status,
            error,
            message: None,
        }
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response body
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.error,
            code: self.status.as_u16(),
            message: self.message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body())).into_response()
    }
}
