//! Show command implementation.

use std::path::Path;

/// Prints the whole content of a collection.
pub fn run(path: &Path, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open(path)?;
    super::require_collection(&db, name)?;

    let values = db.collection(name)?.values()?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}
