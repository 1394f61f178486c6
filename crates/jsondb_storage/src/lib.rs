//! # JsonDB Storage
//!
//! File-per-collection storage for JsonDB.
//!
//! The store maps a name to `<dir>/<name>.<ext>` and moves whole files in
//! and out as **opaque bytes**. It knows nothing about JSON; the codec
//! crate owns the file format, including what the initial content of a new
//! file is.
//!
//! ## Design Principles
//!
//! - A file is always read and written in full
//! - Writes go to a temporary file that is renamed over the target, so a
//!   concurrent reader sees either the old or the new content
//! - Every operation has a blocking (`std::fs`) and a non-blocking
//!   (`tokio::fs`) form with the same observable result
//! - No locking: callers serialize writers to the same name
//!
//! ## Example
//!
//! ```rust
//! use jsondb_storage::FileStore;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = FileStore::new(dir.path(), "json");
//!
//! let bytes = store.read_or_init("users", b"null").unwrap();
//! assert_eq!(bytes, b"null");
//!
//! store.write("users", b"[]").unwrap();
//! assert_eq!(store.read_or_init("users", b"null").unwrap(), b"[]");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;

pub use error::{StorageError, StorageResult};
pub use file::{validate_name, FileStore};
