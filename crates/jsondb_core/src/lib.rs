//! # JsonDB Core
//!
//! An embedded document store that keeps each collection in one
//! human-readable JSON file.
//!
//! This crate provides:
//! - [`Database`]: owns a base directory and hands out collection handles
//! - [`Collection`] / [`AsyncCollection`]: blocking and async access to one
//!   collection, with identical operations and results
//! - record CRUD in array mode, keyed entries in map mode, and dot-notation
//!   deep-path edits
//! - a per-collection [`MutationGate`] so concurrent writes never lose
//!   updates
//!
//! ## Example
//!
//! ```rust,ignore
//! use jsondb_core::{Database, Query};
//! use serde_json::json;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("data"))?;
//! let mons = db.collection("mons")?;
//!
//! mons.insert(json!({"name": "Bulbasaur", "type": "grass"}))?;
//! mons.insert(json!({"name": "Charmander", "type": "fire"}))?;
//!
//! let grass = mons.get(json!({"type": "grass"}))?;
//! assert_eq!(grass.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod collection;
pub mod config;
pub mod database;
pub mod dir;
pub mod document;
pub mod error;

pub use collection::{AsyncCollection, Collection, MutationGate};
pub use config::Config;
pub use database::{Database, DeleteAllReport};
pub use document::{deep_merge, is_match, Key, Path, Query};
pub use error::{CoreError, CoreResult};
pub use jsondb_codec::{Document, Shape};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
