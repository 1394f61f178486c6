//! Error types for JsonDB core.

use serde_json::Value;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in JsonDB core operations.
///
/// A missing record, key or path is not an error: the operations that look
/// something up report it as `None` or `false`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage error (reading, writing or removing a collection file).
    #[error("storage error: {0}")]
    Storage(#[from] jsondb_storage::StorageError),

    /// Codec error while encoding a document.
    #[error("codec error: {0}")]
    Codec(#[from] jsondb_codec::CodecError),

    /// I/O error outside of a collection file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A collection file could not be decoded.
    #[error("collection {collection:?} is corrupt: {source}")]
    Corrupt {
        /// Collection name.
        collection: String,
        /// The decode failure.
        source: jsondb_codec::CodecError,
    },

    /// A value does not have the shape an operation requires.
    #[error("{context}: expected {expected}, found {found}")]
    Shape {
        /// What was being operated on.
        context: String,
        /// Expected shape.
        expected: &'static str,
        /// Shape that was found.
        found: &'static str,
    },

    /// A record `id` is not an integer in `1..=2^53 - 1`, or no such id is left.
    #[error("invalid record id {value}: ids must be integers from 1 to 2^53 - 1")]
    InvalidId {
        /// The offending `id` value.
        value: Value,
    },

    /// A record `id` is already taken.
    #[error("duplicate record id {id}")]
    DuplicateId {
        /// The duplicated id.
        id: u64,
    },

    /// A deep path could not be parsed.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The path as written.
        path: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A collection name cannot be used.
    #[error("invalid collection name {name:?}: {reason}")]
    InvalidCollectionName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// The base directory cannot be used.
    #[error("invalid database directory {}: {reason}", .path.display())]
    InvalidDirectory {
        /// The directory.
        path: PathBuf,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Database is already open or locked.
    #[error("database locked: another handle has exclusive access")]
    DatabaseLocked,
}

impl CoreError {
    /// Creates a shape error.
    pub fn shape(context: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::Shape {
            context: context.into(),
            expected,
            found,
        }
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason,
        }
    }

    /// Creates an invalid directory error.
    pub fn invalid_directory(path: impl Into<PathBuf>, reason: &'static str) -> Self {
        Self::InvalidDirectory {
            path: path.into(),
            reason,
        }
    }

    /// Returns `true` for shape errors.
    #[must_use]
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }
}
