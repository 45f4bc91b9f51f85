//! API error types

use std::time::Duration;

/// Errors that can occur while loading records from the feed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-success HTTP response.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Network error during the request.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse the response body.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the failure could succeed on a later attempt.
    ///
    /// Reported in the failure log line; the loader never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Network(_) => true,
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_only_for_http() {
        assert_eq!(ApiError::http(404, "missing").status_code(), Some(404));
        assert_eq!(ApiError::parse_with_body("bad", "{").status_code(), None);
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(ApiError::http(503, "").is_retryable());
        assert!(!ApiError::http(404, "").is_retryable());
        assert!(ApiError::Timeout(Duration::from_secs(1)).is_retryable());
        assert!(!ApiError::InvalidUrl("nope".into()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = ApiError::http(500, "boom");
        assert_eq!(err.to_string(), "HTTP 500: boom");
    }
}
