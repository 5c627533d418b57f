//! Error types for the Spark Canvas API client.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use spark_canvas_core::ValidationError;
use thiserror::Error;

use crate::session::SessionError;

/// Message surfaced when the server did not provide one.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Errors that can occur when calling the Spark Canvas API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, reset, ...).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request exceeded the configured timeout.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The server answered with a 4xx/5xx status.
    ///
    /// A 401 has already cleared the session and notified the unauthorized
    /// hook by the time the caller sees this.
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or(GENERIC_ERROR_MESSAGE))]
    Status {
        /// Response status code.
        status: StatusCode,
        /// The `error` field of the response body, when present.
        message: Option<String>,
    },

    /// A successful response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built (bad path, header, or missing field).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Reading or writing the session store failed.
    #[error("session store error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Status code of an HTTP error, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the request's credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Text suitable for showing to a user: the server-provided message when
    /// there is one, else a generic fallback.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Status {
                message: Some(message),
                ..
            }
            | Self::InvalidRequest(message) => message.as_str(),
            _ => GENERIC_ERROR_MESSAGE,
        }
    }

    /// Classify a transport error from reqwest.
    pub(crate) fn from_transport(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else if error.is_builder() {
            Self::InvalidRequest(error.to_string())
        } else {
            Self::Network(error)
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::InvalidRequest(error.to_string())
    }
}

/// Error body returned by the API (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Extract the server-provided message from an error body.
///
/// Non-JSON bodies and blank messages yield `None`.
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
}
