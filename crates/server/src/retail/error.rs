//! Error types for the Retail API client.

use thiserror::Error;

/// Errors that can occur when interacting with the Retail API.
#[derive(Debug, Error)]
pub enum RetailError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Could not obtain an access token.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The request itself was rejected (malformed filter, unknown placement, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller lacks permission or the token was rejected.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other error status returned by the API.
    #[error("API error ({status} {code}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Canonical error code (e.g. `UNAVAILABLE`).
        code: String,
        /// Error message.
        message: String,
    },

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

impl RetailError {
    /// Classify an error response by HTTP status and response body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
        let (code, message) = parsed.map_or_else(
            || (String::new(), body.trim().to_string()),
            |r| (r.error.status, r.error.message),
        );

        match (status, code.as_str()) {
            (_, "INVALID_ARGUMENT") | (400, "") => Self::InvalidArgument(message),
            (_, "NOT_FOUND") | (404, "") => Self::NotFound(message),
            (_, "PERMISSION_DENIED" | "UNAUTHENTICATED") | (401 | 403, "") => {
                Self::PermissionDenied(message)
            }
            _ => Self::Api {
                status,
                code,
                message,
            },
        }
    }

    /// Returns `true` if the service rejected the request arguments.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

/// Google API error envelope.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// HTTP status code echoed by the API.
    #[serde(default)]
    pub code: u16,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Canonical status name (e.g. `INVALID_ARGUMENT`).
    #[serde(default)]
    pub status: String,
}
