//! Set command implementation.

use serde_json::Value;
use std::path::Path;
use tracing::info;

/// Writes a JSON value at a dot-notation path.
///
/// The value is parsed as JSON; text that is not valid JSON is stored as a
/// string.
pub fn run(
    path: &Path,
    name: &str,
    key_path: &str,
    raw: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open(path)?;
    let value = parse_value(raw);

    db.collection(name)?.set_in(key_path, value)?;
    info!(collection = name, path = key_path, "value written");
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_parse_as_json_first() {
        assert_eq!(parse_value("5"), json!(5));
        assert_eq!(parse_value(r#"{"a": [1]}"#), json!({"a": [1]}));
        assert_eq!(parse_value("\"quoted\""), json!("quoted"));
        assert_eq!(parse_value("dark"), json!("dark"));
    }
}
