//! Error descriptor returned in place of products.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Category text for a search the service rejected as invalid.
pub const INVALID_ARGUMENT_MESSAGE: &str = "Invalid argument. Please check your serving config.";

/// Category text for any other failure while searching.
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching for products.";

/// `{"error": ..., "details": ...}` record emitted when a search fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Human-readable category.
    pub error: String,
    /// Diagnostic text from the underlying failure.
    pub details: String,
}

impl ErrorRecord {
    /// The search service rejected the request.
    #[must_use]
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self {
            error: INVALID_ARGUMENT_MESSAGE.to_owned(),
            details: details.into(),
        }
    }

    /// Any other failure from either remote call.
    #[must_use]
    pub fn search_failed(details: impl Into<String>) -> Self {
        Self {
            error: SEARCH_FAILED_MESSAGE.to_owned(),
            details: details.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.details)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_record() {
        let record = ErrorRecord::invalid_argument("bad placement");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": "Invalid argument. Please check your serving config.",
                "details": "bad placement"
            })
        );
    }

    #[test]
    fn test_search_failed_record() {
        let record = ErrorRecord::search_failed("connection reset");
        assert_eq!(record.error, SEARCH_FAILED_MESSAGE);
        assert_eq!(
            record.to_string(),
            "An error occurred while searching for products.: connection reset"
        );
    }
}
