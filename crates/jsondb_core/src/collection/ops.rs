//! Collection operations as pure transforms over a loaded [`Document`].
//!
//! Every operation exists exactly once here. The blocking and async handles
//! only differ in how they load, lock and save around these functions.
//!
//! Writes take `&mut Document` and return an [`Outcome`]: the value handed
//! back to the caller plus whether the document changed and must be saved.
//! Reads take the document by value.

use crate::document::{
    deep_merge, get_path, get_path_mut, remove_path, set_path, Key, Path, Query,
};
use crate::error::{CoreError, CoreResult};
use jsondb_codec::{type_name, Document, Shape};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Result of a write transform.
#[derive(Debug, PartialEq)]
pub(crate) struct Outcome<R> {
    pub(crate) output: R,
    pub(crate) dirty: bool,
}

impl<R> Outcome<R> {
    /// The document changed and must be saved.
    pub(crate) fn write(output: R) -> Self {
        Self {
            output,
            dirty: true,
        }
    }

    /// The document is unchanged; nothing is saved.
    pub(crate) fn keep(output: R) -> Self {
        Self {
            output,
            dirty: false,
        }
    }
}

fn mode_error(context: &str, expected: Shape, found: Shape) -> CoreError {
    let expected = match expected {
        Shape::Array => "an array-mode collection",
        Shape::Map => "a map-mode collection",
        Shape::Absent => "an absent collection",
    };
    CoreError::shape(context, expected, found.as_str())
}

/// Records of an array-mode document. An absent document becomes `[]`.
fn records_mut<'a>(doc: &'a mut Document, context: &str) -> CoreResult<&'a mut Vec<Value>> {
    if doc.is_absent() {
        *doc = Document::Array(Vec::new());
    }
    match doc {
        Document::Array(records) => Ok(records),
        other => Err(mode_error(context, Shape::Array, other.shape())),
    }
}

/// Entries of a map-mode document. An absent document becomes `{}`.
fn entries_mut<'a>(
    doc: &'a mut Document,
    context: &str,
) -> CoreResult<&'a mut Map<String, Value>> {
    if doc.is_absent() {
        *doc = Document::Map(Map::new());
    }
    match doc {
        Document::Map(entries) => Ok(entries),
        other => Err(mode_error(context, Shape::Map, other.shape())),
    }
}

/// Runs `f` against the document as a single object root.
fn with_map_root<R>(
    doc: &mut Document,
    context: &str,
    f: impl FnOnce(&mut Value) -> CoreResult<Outcome<R>>,
) -> CoreResult<Outcome<R>> {
    let mut root = Value::Object(std::mem::take(entries_mut(doc, context)?));
    let result = f(&mut root);
    if let Value::Object(entries) = root {
        *doc = Document::Map(entries);
    }
    result
}

fn record_id(record: &Value) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}

/// `id` values that ask for an id to be assigned.
fn is_unset(id: &Value) -> bool {
    match id {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn into_object(value: Value, context: &str) -> CoreResult<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::shape(context, "an object", type_name(&other))),
    }
}

/// Largest record id: `2^53 - 1`, the largest integer every JSON reader
/// holds exactly.
pub(crate) const MAX_RECORD_ID: u64 = (1 << 53) - 1;

/// Hands out record ids for one transform.
struct IdAllocator {
    taken: HashSet<u64>,
    next: u64,
}

impl IdAllocator {
    fn new(records: &[Value]) -> Self {
        let taken: HashSet<u64> = records.iter().filter_map(record_id).collect();
        let next = taken.iter().max().map_or(1, |max| max.saturating_add(1));
        Self { taken, next }
    }

    /// The next free id, or `InvalidId` once ids past the highest stored
    /// one would exceed [`MAX_RECORD_ID`].
    fn assign(&self) -> CoreResult<u64> {
        if self.next > MAX_RECORD_ID {
            return Err(CoreError::InvalidId {
                value: Value::from(self.next),
            });
        }
        Ok(self.next)
    }

    /// Validates `record` and gives it an id if it has none.
    fn admit(&mut self, record: Value) -> CoreResult<Value> {
        let mut record = into_object(record, "record")?;

        let id = match record.get("id") {
            None => self.assign()?,
            Some(id) if is_unset(id) => self.assign()?,
            Some(id) => {
                let id = id
                    .as_u64()
                    .filter(|id| (1..=MAX_RECORD_ID).contains(id))
                    .ok_or_else(|| CoreError::InvalidId { value: id.clone() })?;
                if self.taken.contains(&id) {
                    return Err(CoreError::DuplicateId { id });
                }
                id
            }
        };

        self.taken.insert(id);
        self.next = self.next.max(id + 1);
        record.insert("id".to_string(), Value::from(id));
        Ok(Value::Object(record))
    }
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

pub(crate) fn get(doc: Document, query: &Query) -> Document {
    match doc {
        Document::Absent => Document::Array(Vec::new()),
        Document::Array(records) => {
            Document::Array(records.into_iter().filter(|r| query.matches(r)).collect())
        }
        map @ Document::Map(_) => map,
    }
}

pub(crate) fn find_one(doc: Document, query: &Query) -> Option<Value> {
    match doc {
        Document::Array(records) => records.into_iter().find(|r| query.matches(r)),
        _ => None,
    }
}

pub(crate) fn exists(doc: &Document, query: &Query) -> bool {
    match doc {
        Document::Absent => false,
        Document::Array(records) => records.iter().any(|r| query.matches(r)),
        Document::Map(entries) => !entries.is_empty(),
    }
}

pub(crate) fn has(doc: &Document, key: &Key) -> bool {
    match doc {
        Document::Absent => false,
        Document::Array(records) => key
            .as_id()
            .is_some_and(|id| records.iter().any(|r| record_id(r) == Some(id))),
        Document::Map(entries) => entries.contains_key(&key.as_map_key()),
    }
}

pub(crate) fn count(doc: &Document, query: &Query) -> usize {
    match doc {
        Document::Absent => 0,
        Document::Array(records) => records.iter().filter(|r| query.matches(r)).count(),
        Document::Map(entries) => entries.len(),
    }
}

pub(crate) fn keys(doc: &Document) -> Vec<Key> {
    match doc {
        Document::Absent => Vec::new(),
        Document::Array(records) => records.iter().filter_map(record_id).map(Key::Id).collect(),
        Document::Map(entries) => entries.keys().cloned().map(Key::Name).collect(),
    }
}

pub(crate) fn values(doc: Document) -> Document {
    match doc {
        Document::Absent => Document::Array(Vec::new()),
        other => other,
    }
}

pub(crate) fn first(doc: Document) -> Option<Value> {
    match doc {
        Document::Array(records) => records.into_iter().next(),
        _ => None,
    }
}

pub(crate) fn last(doc: Document) -> Option<Value> {
    match doc {
        Document::Array(records) => records.into_iter().next_back(),
        _ => None,
    }
}

pub(crate) fn get_in(doc: Document, path: &Path) -> Option<Value> {
    let root = doc.into_value();
    get_path(&root, path).cloned()
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

pub(crate) fn insert(doc: &mut Document, record: Value) -> CoreResult<Outcome<Value>> {
    let records = records_mut(doc, "insert")?;
    let record = IdAllocator::new(records).admit(record)?;
    records.push(record.clone());
    Ok(Outcome::write(record))
}

pub(crate) fn bulk_insert(doc: &mut Document, batch: Vec<Value>) -> CoreResult<Outcome<Vec<Value>>> {
    let records = records_mut(doc, "bulk_insert")?;
    let mut ids = IdAllocator::new(records);
    let admitted = batch
        .into_iter()
        .map(|record| ids.admit(record))
        .collect::<CoreResult<Vec<_>>>()?;

    if admitted.is_empty() {
        return Ok(Outcome::keep(admitted));
    }
    records.extend(admitted.iter().cloned());
    Ok(Outcome::write(admitted))
}

pub(crate) fn insert_entry(doc: &mut Document, key: String, value: Value) -> CoreResult<Outcome<Value>> {
    let entries = entries_mut(doc, "insert_entry")?;
    entries.insert(key.clone(), value.clone());

    let mut output = Map::new();
    output.insert(key, value);
    Ok(Outcome::write(Value::Object(output)))
}

pub(crate) fn update(doc: &mut Document, key: &Key, partial: Value) -> CoreResult<Outcome<Option<Value>>> {
    match doc {
        Document::Absent => Ok(Outcome::keep(None)),
        Document::Array(records) => {
            let mut partial = into_object(partial, "update partial")?;
            partial.shift_remove("id");

            let found = key
                .as_id()
                .and_then(|id| records.iter_mut().find(|r| record_id(r) == Some(id)));
            match found {
                Some(record) => {
                    deep_merge(record, Value::Object(partial));
                    Ok(Outcome::write(Some(record.clone())))
                }
                None => Ok(Outcome::keep(None)),
            }
        }
        Document::Map(entries) => match entries.get_mut(&key.as_map_key()) {
            Some(entry) => {
                deep_merge(entry, partial);
                Ok(Outcome::write(Some(entry.clone())))
            }
            None => Ok(Outcome::keep(None)),
        },
    }
}

pub(crate) fn remove(doc: &mut Document, key: &Key) -> Outcome<bool> {
    let removed = match doc {
        Document::Absent => false,
        Document::Array(records) => {
            let position = key
                .as_id()
                .and_then(|id| records.iter().position(|r| record_id(r) == Some(id)));
            position.map(|i| records.remove(i)).is_some()
        }
        Document::Map(entries) => entries.shift_remove(&key.as_map_key()).is_some(),
    };

    if removed {
        Outcome::write(true)
    } else {
        Outcome::keep(false)
    }
}

pub(crate) fn upsert(doc: &mut Document, query: &Query, partial: Value) -> CoreResult<Outcome<Value>> {
    let records = records_mut(doc, "upsert")?;
    let mut partial = into_object(partial, "upsert partial")?;

    if let Some(record) = records.iter_mut().find(|r| query.matches(r)) {
        partial.shift_remove("id");
        deep_merge(record, Value::Object(partial));
        return Ok(Outcome::write(record.clone()));
    }

    if let Some(id) = query.id_shape() {
        if partial.get("id").map_or(true, is_unset) {
            partial.insert("id".to_string(), Value::from(id));
        }
    }
    let record = IdAllocator::new(records).admit(Value::Object(partial))?;
    records.push(record.clone());
    Ok(Outcome::write(record))
}

pub(crate) fn clear(doc: &mut Document) -> Outcome<()> {
    *doc = Document::Array(Vec::new());
    Outcome::write(())
}

pub(crate) fn clear_as_map(doc: &mut Document) -> Outcome<()> {
    *doc = Document::Map(Map::new());
    Outcome::write(())
}

pub(crate) fn set_in(doc: &mut Document, path: &Path, value: Value) -> CoreResult<Outcome<()>> {
    with_map_root(doc, "set_in", |root| {
        set_path(root, path, value)?;
        Ok(Outcome::write(()))
    })
}

pub(crate) fn merge_in(doc: &mut Document, path: &Path, patch: Value) -> CoreResult<Outcome<Value>> {
    with_map_root(doc, "merge_in", |root| {
        let mut merged = get_path(root, path)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        deep_merge(&mut merged, patch);
        set_path(root, path, merged.clone())?;
        Ok(Outcome::write(merged))
    })
}

pub(crate) fn push_in(doc: &mut Document, path: &Path, value: Value) -> CoreResult<Outcome<usize>> {
    with_map_root(doc, "push_in", |root| match get_path_mut(root, path) {
        Some(Value::Array(items)) => {
            items.push(value);
            Ok(Outcome::write(items.len()))
        }
        None | Some(Value::Null) => {
            set_path(root, path, Value::Array(vec![value]))?;
            Ok(Outcome::write(1))
        }
        Some(other) => Err(CoreError::shape(
            format!("push_in at {path}"),
            "an array",
            type_name(other),
        )),
    })
}

pub(crate) fn pull_in(doc: &mut Document, path: &Path, query: &Query) -> CoreResult<Outcome<Vec<Value>>> {
    with_map_root(doc, "pull_in", |root| match get_path_mut(root, path) {
        None => Ok(Outcome::keep(Vec::new())),
        Some(Value::Array(items)) => {
            let (removed, kept): (Vec<_>, Vec<_>) =
                std::mem::take(items).into_iter().partition(|v| query.matches(v));
            *items = kept;
            if removed.is_empty() {
                Ok(Outcome::keep(removed))
            } else {
                Ok(Outcome::write(removed))
            }
        }
        Some(other) => Err(CoreError::shape(
            format!("pull_in at {path}"),
            "an array",
            type_name(other),
        )),
    })
}

pub(crate) fn delete_in(doc: &mut Document, path: &Path) -> CoreResult<Outcome<bool>> {
    if doc.is_absent() {
        return Ok(Outcome::keep(false));
    }
    with_map_root(doc, "delete_in", |root| {
        Ok(match remove_path(root, path) {
            Some(_) => Outcome::write(true),
            None => Outcome::keep(false),
        })
    })
}

pub(crate) fn update_in<F>(doc: &mut Document, path: &Path, updater: F) -> CoreResult<Outcome<Value>>
where
    F: FnOnce(Option<Value>) -> Value,
{
    with_map_root(doc, "update_in", |root| {
        let updated = updater(get_path(root, path).cloned());
        set_path(root, path, updated.clone())?;
        Ok(Outcome::write(updated))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn array(records: Value) -> Document {
        Document::from_value(records).unwrap()
    }

    fn path(raw: &str) -> Path {
        Path::parse(raw).unwrap()
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut doc = Document::Absent;
        let a = insert(&mut doc, json!({"name": "a"})).unwrap();
        let b = insert(&mut doc, json!({"name": "b", "id": null})).unwrap();
        let c = insert(&mut doc, json!({"name": "c", "id": 0})).unwrap();

        assert!(a.dirty);
        assert_eq!(a.output["id"], 1);
        assert_eq!(b.output["id"], 2);
        assert_eq!(c.output["id"], 3);
        assert_eq!(doc.len(), 3);
    }

    #[test]
    fn insert_continues_after_highest_id() {
        let mut doc = array(json!([{"id": 7}, {"id": 3}]));
        let record = insert(&mut doc, json!({})).unwrap().output;
        assert_eq!(record["id"], 8);
    }

    #[test]
    fn insert_rejects_bad_records() {
        let mut doc = array(json!([{"id": 1}]));
        assert!(matches!(
            insert(&mut doc, json!({"id": 1})),
            Err(CoreError::DuplicateId { id: 1 })
        ));
        assert!(matches!(
            insert(&mut doc, json!({"id": -4})),
            Err(CoreError::InvalidId { .. })
        ));
        assert!(matches!(
            insert(&mut doc, json!({"id": "abc"})),
            Err(CoreError::InvalidId { .. })
        ));
        assert!(insert(&mut doc, json!("text")).unwrap_err().is_shape());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn explicit_ids_are_capped() {
        let mut doc = Document::Absent;
        assert!(matches!(
            insert(&mut doc, json!({"id": u64::MAX})),
            Err(CoreError::InvalidId { .. })
        ));
        assert!(matches!(
            insert(&mut doc, json!({"id": MAX_RECORD_ID + 1})),
            Err(CoreError::InvalidId { .. })
        ));
        assert_eq!(doc.len(), 0);

        let top = insert(&mut doc, json!({"id": MAX_RECORD_ID})).unwrap().output;
        assert_eq!(top["id"], MAX_RECORD_ID);
        assert!(matches!(insert(&mut doc, json!({})), Err(CoreError::InvalidId { .. })));
        assert_eq!(insert(&mut doc, json!({"id": 1})).unwrap().output["id"], 1);
    }

    #[test]
    fn oversized_stored_id_does_not_block_explicit_ids() {
        let mut doc = array(json!([{"id": u64::MAX}]));
        assert!(matches!(insert(&mut doc, json!({})), Err(CoreError::InvalidId { .. })));
        assert!(matches!(
            bulk_insert(&mut doc, vec![json!({"n": 1})]),
            Err(CoreError::InvalidId { .. })
        ));
        assert!(matches!(
            upsert(&mut doc, &Query::from(json!({"n": 1})), json!({"n": 1})),
            Err(CoreError::InvalidId { .. })
        ));
        assert_eq!(doc.len(), 1);

        assert_eq!(insert(&mut doc, json!({"id": 2})).unwrap().output["id"], 2);
        assert!(remove(&mut doc, &Key::Id(u64::MAX)).output);
        assert_eq!(insert(&mut doc, json!({})).unwrap().output["id"], 3);
    }

    #[test]
    fn insert_into_map_is_shape_error() {
        let mut doc = Document::Map(Map::new());
        assert!(insert(&mut doc, json!({})).unwrap_err().is_shape());
        assert!(bulk_insert(&mut doc, vec![json!({})]).unwrap_err().is_shape());
        assert!(upsert(&mut doc, &Query::all(), json!({})).unwrap_err().is_shape());
    }

    #[test]
    fn insert_entry_fixes_map_mode() {
        let mut doc = Document::Absent;
        let out = insert_entry(&mut doc, "theme".into(), json!("dark")).unwrap();
        assert_eq!(out.output, json!({"theme": "dark"}));
        assert_eq!(doc.shape(), Shape::Map);

        let mut records = array(json!([]));
        assert!(insert_entry(&mut records, "x".into(), json!(1)).unwrap_err().is_shape());
    }

    #[test]
    fn bulk_insert_is_all_or_nothing() {
        let mut doc = array(json!([{"id": 1}]));
        let err = bulk_insert(&mut doc, vec![json!({"n": 1}), json!({"id": 1})]).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateId { id: 1 }));

        let batch = vec![json!({"n": 1}), json!({"id": 10}), json!({"n": 2})];
        let out = bulk_insert(&mut doc, batch).unwrap().output;
        let ids: Vec<_> = out.iter().map(|r| r["id"].as_u64().unwrap()).collect();
        assert_eq!(ids, [2, 10, 11]);
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn bulk_insert_empty_batch_is_not_a_write() {
        let mut doc = Document::Absent;
        let out = bulk_insert(&mut doc, Vec::new()).unwrap();
        assert!(!out.dirty);
        assert!(out.output.is_empty());
    }

    #[test]
    fn update_merges_and_keeps_id() {
        let mut doc = array(json!([
            {"id": 1, "name": "a", "stats": {"hp": 10, "atk": 5}, "tags": [1, 2]}
        ]));
        let out = update(
            &mut doc,
            &Key::Id(1),
            json!({"id": 99, "stats": {"hp": 12}, "tags": [3]}),
        )
        .unwrap();

        assert!(out.dirty);
        assert_eq!(
            out.output,
            Some(json!({"id": 1, "name": "a", "stats": {"hp": 12, "atk": 5}, "tags": [3]}))
        );
    }

    #[test]
    fn update_missing_is_none() {
        let mut doc = array(json!([{"id": 1}]));
        let out = update(&mut doc, &Key::Id(2), json!({"x": 1})).unwrap();
        assert_eq!(out, Outcome::keep(None));

        let mut absent = Document::Absent;
        assert_eq!(update(&mut absent, &Key::Id(1), json!({})).unwrap(), Outcome::keep(None));
        assert!(absent.is_absent());
    }

    #[test]
    fn update_map_entry() {
        let mut doc = Document::from_value(json!({"cfg": {"a": 1}, "n": 1})).unwrap();
        let out = update(&mut doc, &Key::from("cfg"), json!({"b": 2})).unwrap();
        assert_eq!(out.output, Some(json!({"a": 1, "b": 2})));

        let out = update(&mut doc, &Key::from("n"), json!(5)).unwrap();
        assert_eq!(out.output, Some(json!(5)));
    }

    #[test]
    fn remove_reports_and_skips_write() {
        let mut doc = array(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(remove(&mut doc, &Key::Id(1)), Outcome::write(true));
        assert_eq!(remove(&mut doc, &Key::Id(1)), Outcome::keep(false));
        assert_eq!(doc, array(json!([{"id": 2}])));

        let mut map = Document::from_value(json!({"a": 1})).unwrap();
        assert_eq!(remove(&mut map, &Key::from("a")), Outcome::write(true));
        assert_eq!(remove(&mut Document::Absent, &Key::Id(1)), Outcome::keep(false));
    }

    #[test]
    fn upsert_updates_first_match() {
        let mut doc = array(json!([{"id": 1, "name": "a"}, {"id": 2, "name": "a"}]));
        let out = upsert(&mut doc, &Query::from(json!({"name": "a"})), json!({"seen": true})).unwrap();
        assert_eq!(out.output, json!({"id": 1, "name": "a", "seen": true}));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn upsert_inserts_with_query_id() {
        let mut doc = Document::Absent;
        let out = upsert(&mut doc, &Query::id(5), json!({"name": "e"})).unwrap();
        assert_eq!(out.output, json!({"name": "e", "id": 5}));

        let out = upsert(&mut doc, &Query::from(json!({"name": "f"})), json!({"name": "f"})).unwrap();
        assert_eq!(out.output["id"], 6);
    }

    #[test]
    fn clear_resets_mode() {
        let mut doc = Document::from_value(json!({"a": 1})).unwrap();
        clear(&mut doc);
        assert_eq!(doc, Document::Array(vec![]));
        clear_as_map(&mut doc);
        assert_eq!(doc, Document::Map(Map::new()));
    }

    #[test]
    fn reads_over_each_shape() {
        let doc = array(json!([{"id": 1, "t": "x"}, {"id": 2, "t": "y"}, {"id": 3, "t": "x"}]));
        let query = Query::from(json!({"t": "x"}));

        assert_eq!(get(doc.clone(), &query).len(), 2);
        assert_eq!(get(doc.clone(), &Query::all()).len(), 3);
        assert_eq!(find_one(doc.clone(), &query), Some(json!({"id": 1, "t": "x"})));
        assert_eq!(count(&doc, &query), 2);
        assert!(exists(&doc, &Query::id(3)));
        assert!(has(&doc, &Key::from("2")));
        assert!(!has(&doc, &Key::from("two")));
        assert_eq!(keys(&doc), [Key::Id(1), Key::Id(2), Key::Id(3)]);
        assert_eq!(first(doc.clone()).unwrap()["id"], 1);
        assert_eq!(last(doc).unwrap()["id"], 3);

        let absent = Document::Absent;
        assert_eq!(get(absent.clone(), &Query::all()), Document::Array(vec![]));
        assert_eq!(values(absent.clone()), Document::Array(vec![]));
        assert!(!exists(&absent, &Query::all()));
        assert_eq!(count(&absent, &Query::all()), 0);
        assert!(first(absent).is_none());

        let map = Document::from_value(json!({"a": 1, "b": 2})).unwrap();
        assert_eq!(get(map.clone(), &query), map);
        assert_eq!(count(&map, &query), 2);
        assert!(exists(&map, &query));
        assert!(has(&map, &Key::from("b")));
        assert_eq!(keys(&map), [Key::from("a"), Key::from("b")]);
        assert!(find_one(map, &Query::all()).is_none());
    }

    #[test]
    fn deep_paths_on_absent_build_a_map() {
        let mut doc = Document::Absent;
        set_in(&mut doc, &path("a.b.c"), json!(5)).unwrap();
        assert_eq!(get_in(doc.clone(), &path("a.b.c")), Some(json!(5)));
        assert_eq!(get_in(doc.clone(), &path("a.x")), None);
        assert_eq!(doc.shape(), Shape::Map);
    }

    #[test]
    fn deep_write_on_array_is_shape_error() {
        let mut doc = array(json!([{"id": 1}]));
        assert!(set_in(&mut doc, &path("a"), json!(1)).unwrap_err().is_shape());
        assert_eq!(doc, array(json!([{"id": 1}])));
        assert_eq!(get_in(doc, &path("0.id")), Some(json!(1)));
    }

    #[test]
    fn merge_in_creates_and_merges() {
        let mut doc = Document::Absent;
        let out = merge_in(&mut doc, &path("cfg"), json!({"a": 1})).unwrap();
        assert_eq!(out.output, json!({"a": 1}));
        let out = merge_in(&mut doc, &path("cfg"), json!({"b": {"c": 2}})).unwrap();
        assert_eq!(out.output, json!({"a": 1, "b": {"c": 2}}));
    }

    #[test]
    fn push_and_pull() {
        let mut doc = Document::Absent;
        assert_eq!(push_in(&mut doc, &path("list"), json!(1)).unwrap().output, 1);
        assert_eq!(push_in(&mut doc, &path("list"), json!(2)).unwrap().output, 2);
        assert_eq!(push_in(&mut doc, &path("list"), json!(1)).unwrap().output, 3);

        let out = pull_in(&mut doc, &path("list"), &Query::from(json!(1))).unwrap();
        assert_eq!(out, Outcome::write(vec![json!(1), json!(1)]));
        assert_eq!(get_in(doc.clone(), &path("list")), Some(json!([2])));

        let none = pull_in(&mut doc, &path("list"), &Query::from(json!(9))).unwrap();
        assert_eq!(none, Outcome::keep(vec![]));
        let missing = pull_in(&mut doc, &path("nope"), &Query::all()).unwrap();
        assert_eq!(missing, Outcome::keep(vec![]));
    }

    #[test]
    fn push_and_pull_on_scalar_fail() {
        let mut doc = Document::from_value(json!({"name": "x"})).unwrap();
        let err = push_in(&mut doc, &path("name"), json!(1)).unwrap_err();
        assert!(matches!(err, CoreError::Shape { found: "string", .. }));
        assert!(pull_in(&mut doc, &path("name"), &Query::all()).unwrap_err().is_shape());
        assert_eq!(doc, Document::from_value(json!({"name": "x"})).unwrap());
    }

    #[test]
    fn delete_in_reports_presence() {
        let mut doc = Document::from_value(json!({"a": {"b": 1}})).unwrap();
        assert_eq!(delete_in(&mut doc, &path("a.b")).unwrap(), Outcome::write(true));
        assert_eq!(delete_in(&mut doc, &path("a.b")).unwrap(), Outcome::keep(false));

        let mut absent = Document::Absent;
        assert_eq!(delete_in(&mut absent, &path("a")).unwrap(), Outcome::keep(false));
        assert!(absent.is_absent());
    }

    #[test]
    fn update_in_sees_current_value() {
        let mut doc = Document::Absent;
        let bump = |current: Option<Value>| json!(current.and_then(|v| v.as_u64()).unwrap_or(0) + 1);

        assert_eq!(update_in(&mut doc, &path("hits"), bump).unwrap().output, json!(1));
        assert_eq!(update_in(&mut doc, &path("hits"), bump).unwrap().output, json!(2));
    }
}
