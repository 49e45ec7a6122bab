//! Error types for client operations.

use crate::engine::SearchEngineVariant;
use quarry_dsl::DslError;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, SearchClientError>;

/// Failure to deliver a request or read its response.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Underlying HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Response error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as received.
        body: String,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// HTTP status code, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<url::ParseError> for TransportError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Search client error type.
#[derive(Error, Debug)]
pub enum SearchClientError {
    /// A request body could not be built or read back.
    #[error(transparent)]
    Dsl(#[from] DslError),

    /// The connected engine does not support the operation.
    #[error("{message} (connected to {variant})")]
    UnsupportedEngine {
        /// Caller-supplied explanation.
        message: String,
        /// Variant that was detected.
        variant: SearchEngineVariant,
    },

    /// Transport failure, passed through unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body is not a JSON object.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_engine_message() {
        let err = SearchClientError::UnsupportedEngine {
            message: "ilm only works on Elasticsearch".to_string(),
            variant: SearchEngineVariant::Os2,
        };
        assert_eq!(
            err.to_string(),
            "ilm only works on Elasticsearch (connected to OS2)"
        );
    }

    #[test]
    fn test_status_code() {
        let err = TransportError::Status {
            status: 404,
            body: "{}".to_string(),
        };
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(TransportError::Other("closed".into()).status_code(), None);
    }

    #[test]
    fn test_dsl_error_is_transparent() {
        let err: SearchClientError = DslError::MissingProperty {
            key: "size".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Missing property: size");
    }
}
