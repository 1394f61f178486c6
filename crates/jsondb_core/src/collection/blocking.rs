//! Blocking collection handle.

use super::engine::CollectionCore;
use super::nonblocking::AsyncCollection;
use super::ops;
use crate::document::{Key, Path, Query};
use crate::error::CoreResult;
use jsondb_codec::{Document, Shape};
use serde_json::Value;
use std::sync::Arc;

/// A collection accessed with blocking file I/O.
///
/// Obtained from [`Database::collection`](crate::Database::collection).
/// Handles are cheap to clone; every clone, and every [`AsyncCollection`]
/// for the same name, shares one mutation gate.
///
/// Each call is a full cycle over the collection file: reads load it,
/// writes load, transform and save it while holding the gate.
///
/// Must not be called from inside an async task. Use
/// [`Collection::to_async`] there, or move the call onto
/// `tokio::task::spawn_blocking`.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
///
/// let mons = db.collection("mons")?;
/// let bulbasaur = mons.insert(json!({"name": "Bulbasaur", "type": "grass"}))?;
/// assert_eq!(bulbasaur["id"], 1);
///
/// mons.update(1, json!({"level": 5}))?;
/// assert_eq!(mons.find_by_id(1)?.unwrap()["level"], 5);
/// ```
#[derive(Debug, Clone)]
pub struct Collection {
    core: Arc<CollectionCore>,
}

impl Collection {
    pub(crate) fn new(core: Arc<CollectionCore>) -> Self {
        Self { core }
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.core.name()
    }

    /// Returns an async handle to the same collection.
    #[must_use]
    pub fn to_async(&self) -> AsyncCollection {
        AsyncCollection::new(Arc::clone(&self.core))
    }

    #[cfg(test)]
    pub(crate) fn core(&self) -> &Arc<CollectionCore> {
        &self.core
    }

    /// Current shape of the stored document.
    pub fn shape(&self) -> CoreResult<Shape> {
        self.core.read_blocking(|doc| doc.shape())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Records matching `query`. In map mode the whole map is returned and
    /// the query is ignored. An absent collection reads as `[]`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not decode.
    pub fn get(&self, query: impl Into<Query>) -> CoreResult<Document> {
        let query = query.into();
        self.core.read_blocking(|doc| ops::get(doc, &query))
    }

    /// First record matching `query`.
    pub fn find_one(&self, query: impl Into<Query>) -> CoreResult<Option<Value>> {
        let query = query.into();
        self.core.read_blocking(|doc| ops::find_one(doc, &query))
    }

    /// The record with the given `id`.
    pub fn find_by_id(&self, id: u64) -> CoreResult<Option<Value>> {
        self.find_one(Query::id(id))
    }

    /// Whether any record matches. In map mode: whether the map is non-empty.
    pub fn exists(&self, query: impl Into<Query>) -> CoreResult<bool> {
        let query = query.into();
        self.core.read_blocking(|doc| ops::exists(&doc, &query))
    }

    /// Whether a record with this id (array mode) or an entry with this
    /// key (map mode) exists.
    pub fn has(&self, key: impl Into<Key>) -> CoreResult<bool> {
        let key = key.into();
        self.core.read_blocking(|doc| ops::has(&doc, &key))
    }

    /// Number of matching records, or of map entries.
    pub fn count(&self, query: impl Into<Query>) -> CoreResult<usize> {
        let query = query.into();
        self.core.read_blocking(|doc| ops::count(&doc, &query))
    }

    /// Record ids (array mode) or entry keys (map mode).
    pub fn keys(&self) -> CoreResult<Vec<Key>> {
        self.core.read_blocking(|doc| ops::keys(&doc))
    }

    /// The whole document. An absent collection reads as `[]`.
    pub fn values(&self) -> CoreResult<Document> {
        self.core.read_blocking(ops::values)
    }

    /// First record in array mode.
    pub fn first(&self) -> CoreResult<Option<Value>> {
        self.core.read_blocking(ops::first)
    }

    /// Last record in array mode.
    pub fn last(&self) -> CoreResult<Option<Value>> {
        self.core.read_blocking(ops::last)
    }

    /// Value at a dot-notation `path`, e.g. `settings.theme` or `list[0]`.
    ///
    /// # Errors
    ///
    /// Fails on malformed paths as well as on load errors. A path that
    /// leads nowhere is `Ok(None)`.
    pub fn get_in(&self, path: &str) -> CoreResult<Option<Value>> {
        let path = Path::parse(path)?;
        self.core.read_blocking(|doc| ops::get_in(doc, &path))
    }

    /// Value at `path`, or `default` when there is none.
    pub fn get_in_or(&self, path: &str, default: Value) -> CoreResult<Value> {
        Ok(self.get_in(path)?.unwrap_or(default))
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Appends a record, assigning an `id` if it has none. Returns the
    /// stored record.
    ///
    /// # Errors
    ///
    /// - `Shape` if the record is not an object or the collection is in map mode
    /// - `InvalidId` / `DuplicateId` for a bad explicit `id`
    pub fn insert(&self, record: Value) -> CoreResult<Value> {
        self.core
            .mutate_blocking("insert", |doc| ops::insert(doc, record))
    }

    /// Appends several records in one cycle. Nothing is written if any
    /// record is rejected.
    pub fn bulk_insert(&self, records: Vec<Value>) -> CoreResult<Vec<Value>> {
        self.core
            .mutate_blocking("bulk_insert", |doc| ops::bulk_insert(doc, records))
    }

    /// Sets `key` to `value` in a map-mode collection. Returns `{key: value}`.
    pub fn insert_entry(&self, key: impl Into<String>, value: Value) -> CoreResult<Value> {
        let key = key.into();
        self.core
            .mutate_blocking("insert_entry", |doc| ops::insert_entry(doc, key, value))
    }

    /// Deep-merges `partial` into the record (or entry) at `key` and
    /// returns the result. `Ok(None)` if there is nothing at `key`.
    ///
    /// A record keeps its `id`; an `id` inside `partial` is ignored.
    pub fn update(&self, key: impl Into<Key>, partial: Value) -> CoreResult<Option<Value>> {
        let key = key.into();
        self.core
            .mutate_blocking("update", |doc| ops::update(doc, &key, partial))
    }

    /// Removes the record (or entry) at `key`. Returns whether one existed.
    pub fn remove(&self, key: impl Into<Key>) -> CoreResult<bool> {
        let key = key.into();
        self.core
            .mutate_blocking("remove", |doc| Ok(ops::remove(doc, &key)))
    }

    /// Merges `partial` into the first record matching `query`, or inserts
    /// it. An `{"id": n}` query gives the new record id `n`.
    pub fn upsert(&self, query: impl Into<Query>, partial: Value) -> CoreResult<Value> {
        let query = query.into();
        self.core
            .mutate_blocking("upsert", |doc| ops::upsert(doc, &query, partial))
    }

    /// Replaces the content with an empty array.
    pub fn clear(&self) -> CoreResult<()> {
        self.core.mutate_blocking("clear", |doc| Ok(ops::clear(doc)))
    }

    /// Replaces the content with an empty map.
    pub fn clear_as_map(&self) -> CoreResult<()> {
        self.core
            .mutate_blocking("clear_as_map", |doc| Ok(ops::clear_as_map(doc)))
    }

    /// Removes the collection file. Returns whether it existed. The next
    /// access starts over from an absent collection.
    pub fn delete(&self) -> CoreResult<bool> {
        self.core.delete_blocking()
    }

    /// Writes `value` at `path`, creating intermediate containers.
    pub fn set_in(&self, path: &str, value: Value) -> CoreResult<()> {
        let path = Path::parse(path)?;
        self.core
            .mutate_blocking("set_in", |doc| ops::set_in(doc, &path, value))
    }

    /// Deep-merges `value` into whatever is at `path`. Returns the result.
    pub fn merge_in(&self, path: &str, value: Value) -> CoreResult<Value> {
        let path = Path::parse(path)?;
        self.core
            .mutate_blocking("merge_in", |doc| ops::merge_in(doc, &path, value))
    }

    /// Appends to the array at `path`. Returns its new length.
    ///
    /// # Errors
    ///
    /// `Shape` if something other than an array is at `path`.
    pub fn push_in(&self, path: &str, value: Value) -> CoreResult<usize> {
        let path = Path::parse(path)?;
        self.core
            .mutate_blocking("push_in", |doc| ops::push_in(doc, &path, value))
    }

    /// Removes every element of the array at `path` that matches `query`
    /// and returns them.
    pub fn pull_in(&self, path: &str, query: impl Into<Query>) -> CoreResult<Vec<Value>> {
        let path = Path::parse(path)?;
        let query = query.into();
        self.core
            .mutate_blocking("pull_in", |doc| ops::pull_in(doc, &path, &query))
    }

    /// Removes the value at `path`. Returns whether there was one.
    pub fn delete_in(&self, path: &str) -> CoreResult<bool> {
        let path = Path::parse(path)?;
        self.core
            .mutate_blocking("delete_in", |doc| ops::delete_in(doc, &path))
    }

    /// Replaces the value at `path` with `updater(current)` and returns it.
    pub fn update_in<F>(&self, path: &str, updater: F) -> CoreResult<Value>
    where
        F: FnOnce(Option<Value>) -> Value,
    {
        let path = Path::parse(path)?;
        self.core
            .mutate_blocking("update_in", |doc| ops::update_in(doc, &path, updater))
    }
}

impl From<AsyncCollection> for Collection {
    fn from(collection: AsyncCollection) -> Self {
        collection.to_blocking()
    }
}
