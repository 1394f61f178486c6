//! Get command implementation.

use std::path::Path;

/// Prints the value at a dot-notation path.
pub fn run(path: &Path, name: &str, key_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open(path)?;
    super::require_collection(&db, name)?;

    match db.collection(name)?.get_in(key_path)? {
        Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        None => return Err(format!("Nothing at {key_path:?} in {name:?}").into()),
    }
    Ok(())
}
