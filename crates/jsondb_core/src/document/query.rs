//! Record selection.

use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

/// Selects records in array mode and elements in [`pull_in`].
///
/// [`pull_in`]: crate::Collection::pull_in
#[derive(Clone)]
pub enum Query {
    /// Everything.
    All,
    /// Partial deep match against a pattern, see [`is_match`].
    Match(Value),
    /// Arbitrary predicate.
    Where(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl Query {
    /// Matches everything.
    #[must_use]
    pub fn all() -> Self {
        Query::All
    }

    /// Matches values that contain `pattern`.
    #[must_use]
    pub fn matching(pattern: Value) -> Self {
        Query::Match(pattern)
    }

    /// Matches the record with the given `id`.
    #[must_use]
    pub fn id(id: u64) -> Self {
        Query::Match(json!({ "id": id }))
    }

    /// Matches values for which `predicate` returns `true`.
    pub fn filter<F>(predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Query::Where(Arc::new(predicate))
    }

    /// Tests a single value.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Query::All => true,
            Query::Match(pattern) => is_match(value, pattern),
            Query::Where(predicate) => predicate(value),
        }
    }

    /// Returns `n` if this query is exactly an `{"id": n}` shape.
    pub(crate) fn id_shape(&self) -> Option<u64> {
        match self {
            Query::Match(Value::Object(pattern)) if pattern.len() == 1 => {
                pattern.get("id").and_then(Value::as_u64).filter(|id| *id > 0)
            }
            _ => None,
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::All
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::All => f.write_str("All"),
            Query::Match(pattern) => f.debug_tuple("Match").field(pattern).finish(),
            Query::Where(_) => f.write_str("Where(<fn>)"),
        }
    }
}

impl From<Value> for Query {
    fn from(pattern: Value) -> Self {
        Query::Match(pattern)
    }
}

impl From<Option<Value>> for Query {
    fn from(pattern: Option<Value>) -> Self {
        pattern.map_or(Query::All, Query::Match)
    }
}

/// Partial deep comparison of `value` against `pattern`.
///
/// - objects: every field of `pattern` must match the same field of `value`
/// - arrays: every element of `pattern` must match some element of `value`
/// - numbers: compared by numeric value (`1` matches `1.0`)
/// - anything else: equality
#[must_use]
pub fn is_match(value: &Value, pattern: &Value) -> bool {
    match (value, pattern) {
        (_, Value::Object(pattern)) if pattern.is_empty() => true,
        (Value::Object(value), Value::Object(pattern)) => pattern
            .iter()
            .all(|(key, expected)| value.get(key).is_some_and(|actual| is_match(actual, expected))),
        (Value::Array(value), Value::Array(pattern)) => pattern
            .iter()
            .all(|expected| value.iter().any(|actual| is_match(actual, expected))),
        (Value::Number(a), Value::Number(b)) => match (a.as_i64(), b.as_i64()) {
            (Some(a), Some(b)) => a == b,
            _ => match (a.as_u64(), b.as_u64()) {
                (Some(a), Some(b)) => a == b,
                _ => a.as_f64() == b.as_f64(),
            },
        },
        _ => value == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_match_is_partial() {
        let record = json!({"id": 1, "name": "Bulbasaur", "types": ["grass", "poison"]});
        assert!(is_match(&record, &json!({"name": "Bulbasaur"})));
        assert!(is_match(&record, &json!({"types": ["poison"]})));
        assert!(!is_match(&record, &json!({"name": "Ivysaur"})));
        assert!(!is_match(&record, &json!({"missing": null})));
    }

    #[test]
    fn nested_objects_match_recursively() {
        let record = json!({"owner": {"name": "ash", "badges": 8}});
        assert!(is_match(&record, &json!({"owner": {"name": "ash"}})));
        assert!(!is_match(&record, &json!({"owner": {"name": "gary"}})));
    }

    #[test]
    fn numbers_compare_by_value() {
        assert!(is_match(&json!({"n": 1}), &json!({"n": 1.0})));
        assert!(is_match(&json!({"n": u64::MAX}), &json!({"n": u64::MAX})));
        assert!(!is_match(&json!({"n": 1}), &json!({"n": 2})));
    }

    #[test]
    fn scalars_match_by_equality() {
        assert!(is_match(&json!("a"), &json!("a")));
        assert!(!is_match(&json!("a"), &json!({"a": 1})));
        assert!(is_match(&json!(5), &json!({})));
    }

    #[test]
    fn closure_queries() {
        let query = Query::filter(|v| v["level"].as_u64().is_some_and(|l| l > 10));
        assert!(query.matches(&json!({"level": 12})));
        assert!(!query.matches(&json!({"level": 3})));
        assert_eq!(format!("{query:?}"), "Where(<fn>)");
    }

    #[test]
    fn id_shape_detection() {
        assert_eq!(Query::id(4).id_shape(), Some(4));
        assert_eq!(Query::from(json!({"id": 4, "name": "x"})).id_shape(), None);
        assert_eq!(Query::from(json!({"id": 0})).id_shape(), None);
        assert_eq!(Query::All.id_shape(), None);
    }
}
