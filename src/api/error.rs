//! Fetch error types
//!
//! Every way a slot fetch can fail. The display string of a `FetchError`
//! becomes the reason carried by a slot in the `Error` state.

use thiserror::Error;

use crate::model::TimestampError;

/// Longest response body kept in a `Status` error
const MAX_ERROR_BODY: usize = 200;

/// Errors that can occur when fetching from the AQI backend
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request timed out")]
    Timeout,

    /// Connection refused or host unreachable
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not JSON of the expected shape
    #[error("Malformed payload: {0}")]
    Decode(String),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    #[error("Request failed: {0}")]
    Request(reqwest::Error),
}

impl FetchError {
    /// Build a `Status` error, keeping only the head of the body
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let body = match body.char_indices().nth(MAX_ERROR_BODY) {
            Some((idx, _)) => format!("{}...", &body[..idx]),
            None => body.to_string(),
        };
        FetchError::Status { status, body }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable(err.to_string())
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(FetchError::Timeout.to_string(), "Request timed out");

        let err = FetchError::status(503, "  down for maintenance \n");
        assert_eq!(err.to_string(), "HTTP 503: down for maintenance");
    }

    #[test]
    fn test_status_body_truncated() {
        let long = "x".repeat(500);
        match FetchError::status(500, &long) {
            FetchError::Status { body, .. } => {
                assert_eq!(body.len(), MAX_ERROR_BODY + 3);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: FetchError = json_err.into();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_timestamp_error_is_transparent() {
        let err: FetchError = TimestampError::Invalid("soon".to_string()).into();
        assert_eq!(err.to_string(), "Invalid timestamp: \"soon\"");
    }
}
