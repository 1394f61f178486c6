//! Drop and delete-all command implementations.

use std::path::Path;
use tracing::info;

/// Removes one collection file.
pub fn drop(path: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open(path)?;
    super::require_collection(&db, name)?;

    if db.collection(name)?.delete()? {
        info!(collection = name, "collection dropped");
    }
    Ok(())
}

/// Removes every collection file.
pub fn delete_all(path: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open(path)?;

    if dry_run {
        for name in db.collection_names()? {
            println!("would delete {name}");
        }
        return Ok(());
    }

    let report = db.delete_all()?;
    info!(removed = report.removed, "collections deleted");
    if !report.is_complete() {
        return Err(format!("Could not delete: {}", report.failed.join(", ")).into());
    }
    Ok(())
}
