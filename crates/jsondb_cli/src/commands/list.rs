//! List command implementation.

use jsondb_core::{CoreError, Database, Query, Shape};
use serde::Serialize;
use std::path::Path;

/// Summary of one collection file.
#[derive(Debug, Serialize)]
pub struct CollectionSummary {
    /// Collection name.
    pub name: String,
    /// Stored shape, or `corrupt` if the file does not decode.
    pub shape: String,
    /// Number of records or entries.
    pub count: usize,
    /// File size in bytes.
    pub size: u64,
}

/// Runs the list command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open(path)?;
    let summaries = summarize(&db)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        _ => print_text_output(&db, &summaries),
    }

    Ok(())
}

fn summarize(db: &Database) -> Result<Vec<CollectionSummary>, Box<dyn std::error::Error>> {
    let mut summaries = Vec::new();

    for name in db.collection_names()? {
        let collection = db.collection(&name)?;
        let file = db
            .path()
            .join(format!("{name}.{}", db.config().extension));
        let size = std::fs::metadata(&file).map(|m| m.len()).unwrap_or(0);

        let (shape, count) = match collection.shape() {
            Ok(shape) => (shape, collection.count(Query::all())?),
            Err(CoreError::Corrupt { source, .. }) => {
                tracing::warn!(collection = %name, error = %source, "collection does not decode");
                summaries.push(CollectionSummary {
                    name,
                    shape: "corrupt".to_string(),
                    count: 0,
                    size,
                });
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        summaries.push(CollectionSummary {
            name,
            shape: shape_label(shape).to_string(),
            count,
            size,
        });
    }

    Ok(summaries)
}

fn shape_label(shape: Shape) -> &'static str {
    match shape {
        Shape::Absent => "absent",
        Shape::Array => "records",
        Shape::Map => "map",
    }
}

fn print_text_output(db: &Database, summaries: &[CollectionSummary]) {
    println!("JsonDB Collections");
    println!("==================");
    println!();
    println!("Path: {}", db.path().display());
    println!();

    if summaries.is_empty() {
        println!("  (no collections)");
        return;
    }

    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for summary in summaries {
        println!(
            "  {:width$}  {:8} {:>6} items  {}",
            summary.name,
            summary.shape,
            summary.count,
            format_size(summary.size),
        );
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn summarize_reports_each_file() {
        let temp = tempdir().unwrap();
        let db = Database::open(temp.path()).unwrap();
        db.collection("users").unwrap().insert(json!({"name": "a"})).unwrap();
        db.collection("settings").unwrap().insert_entry("k", json!(1)).unwrap();
        std::fs::write(temp.path().join("broken.json"), b"[").unwrap();

        let summaries = summarize(&db).unwrap();
        let shapes: Vec<_> = summaries.iter().map(|s| (s.name.as_str(), s.shape.as_str())).collect();
        assert_eq!(shapes, [("broken", "corrupt"), ("settings", "map"), ("users", "records")]);
        assert_eq!(summaries[2].count, 1);
    }

    #[test]
    fn sizes_are_humanized() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
