//! Error types for DSL construction.

use thiserror::Error;

/// Result type alias for DSL operations.
pub type Result<T> = std::result::Result<T, DslError>;

/// Errors raised while reading typed values back out of a builder.
///
/// These always indicate a mistake in how the DSL was used, never a
/// transient condition.
#[derive(Error, Debug)]
pub enum DslError {
    /// A required field was read before it was set and has no default.
    #[error("Missing property: {key}")]
    MissingProperty {
        /// Wire key that was looked up.
        key: String,
    },

    /// A single-key wrapper did not contain exactly one entry.
    #[error("Malformed query under '{key}': expected exactly one entry, found {entries}")]
    MalformedQuery {
        /// Wire key holding the wrapper.
        key: String,
        /// Number of entries found (0 when the value is not an object).
        entries: usize,
    },

    /// The stored JSON does not decode into the declared field type.
    #[error("Unexpected value for '{key}': expected {expected}")]
    UnexpectedType {
        /// Wire key.
        key: String,
        /// Expected JSON shape.
        expected: &'static str,
    },

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
