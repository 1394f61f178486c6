//! CLI command implementations.

pub mod delete;
pub mod get;
pub mod list;
pub mod set;
pub mod show;

use jsondb_core::{Config, Database};
use std::path::Path;

/// Opens an existing database directory.
pub fn open(path: &Path) -> Result<Database, Box<dyn std::error::Error>> {
    let config = Config::default().create_if_missing(false);
    Ok(Database::open_with_config(path, config)?)
}

/// Rejects collection names with no file on disk.
pub fn require_collection(db: &Database, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db.collection_names()?.iter().any(|n| n == name) {
        Ok(())
    } else {
        Err(format!("No collection named {name:?} in {}", db.path().display()).into())
    }
}
