//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a document to JSON.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// The bytes are not valid UTF-8 JSON.
    #[error("malformed document at line {line}, column {column}: {message}")]
    Malformed {
        /// Description of the parse error.
        message: String,
        /// Line of the error (1-based, 0 when unknown).
        line: usize,
        /// Column of the error (1-based, 0 when unknown).
        column: usize,
    },

    /// The JSON is valid but is neither the sentinel, an array nor an object.
    #[error("unexpected top-level {found}: expected null, an array or an object")]
    UnexpectedShape {
        /// JSON type that was found at the top level.
        found: &'static str,
    },
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}
