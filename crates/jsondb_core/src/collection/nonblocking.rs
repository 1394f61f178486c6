//! Async collection handle.

use super::blocking::Collection;
use super::engine::CollectionCore;
use super::ops;
use crate::document::{Key, Path, Query};
use crate::error::CoreResult;
use jsondb_codec::{Document, Shape};
use serde_json::Value;
use std::sync::Arc;

/// A collection accessed with `tokio::fs`.
///
/// Offers the same operations as [`Collection`], with the same results,
/// as `async fn`s. Only file I/O and waiting for the mutation gate
/// suspend; the transforms themselves run synchronously.
///
/// Async and blocking handles for one name share a single gate, so a
/// program may mix both forms on the same collection.
#[derive(Debug, Clone)]
pub struct AsyncCollection {
    core: Arc<CollectionCore>,
}

impl AsyncCollection {
    pub(crate) fn new(core: Arc<CollectionCore>) -> Self {
        Self { core }
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.core.name()
    }

    /// Returns a blocking handle to the same collection.
    #[must_use]
    pub fn to_blocking(&self) -> Collection {
        Collection::new(Arc::clone(&self.core))
    }

    #[cfg(test)]
    pub(crate) fn core(&self) -> &Arc<CollectionCore> {
        &self.core
    }

    /// See [`Collection::shape`].
    pub async fn shape(&self) -> CoreResult<Shape> {
        self.core.read(|doc| doc.shape()).await
    }

    /// See [`Collection::get`].
    pub async fn get(&self, query: impl Into<Query>) -> CoreResult<Document> {
        let query = query.into();
        self.core.read(|doc| ops::get(doc, &query)).await
    }

    /// See [`Collection::find_one`].
    pub async fn find_one(&self, query: impl Into<Query>) -> CoreResult<Option<Value>> {
        let query = query.into();
        self.core.read(|doc| ops::find_one(doc, &query)).await
    }

    /// See [`Collection::find_by_id`].
    pub async fn find_by_id(&self, id: u64) -> CoreResult<Option<Value>> {
        self.find_one(Query::id(id)).await
    }

    /// See [`Collection::exists`].
    pub async fn exists(&self, query: impl Into<Query>) -> CoreResult<bool> {
        let query = query.into();
        self.core.read(|doc| ops::exists(&doc, &query)).await
    }

    /// See [`Collection::has`].
    pub async fn has(&self, key: impl Into<Key>) -> CoreResult<bool> {
        let key = key.into();
        self.core.read(|doc| ops::has(&doc, &key)).await
    }

    /// See [`Collection::count`].
    pub async fn count(&self, query: impl Into<Query>) -> CoreResult<usize> {
        let query = query.into();
        self.core.read(|doc| ops::count(&doc, &query)).await
    }

    /// See [`Collection::keys`].
    pub async fn keys(&self) -> CoreResult<Vec<Key>> {
        self.core.read(|doc| ops::keys(&doc)).await
    }

    /// See [`Collection::values`].
    pub async fn values(&self) -> CoreResult<Document> {
        self.core.read(ops::values).await
    }

    /// See [`Collection::first`].
    pub async fn first(&self) -> CoreResult<Option<Value>> {
        self.core.read(ops::first).await
    }

    /// See [`Collection::last`].
    pub async fn last(&self) -> CoreResult<Option<Value>> {
        self.core.read(ops::last).await
    }

    /// See [`Collection::get_in`].
    pub async fn get_in(&self, path: &str) -> CoreResult<Option<Value>> {
        let path = Path::parse(path)?;
        self.core.read(|doc| ops::get_in(doc, &path)).await
    }

    /// See [`Collection::get_in_or`].
    pub async fn get_in_or(&self, path: &str, default: Value) -> CoreResult<Value> {
        Ok(self.get_in(path).await?.unwrap_or(default))
    }

    /// See [`Collection::insert`].
    pub async fn insert(&self, record: Value) -> CoreResult<Value> {
        self.core
            .mutate("insert", |doc| ops::insert(doc, record))
            .await
    }

    /// See [`Collection::bulk_insert`].
    pub async fn bulk_insert(&self, records: Vec<Value>) -> CoreResult<Vec<Value>> {
        self.core
            .mutate("bulk_insert", |doc| ops::bulk_insert(doc, records))
            .await
    }

    /// See [`Collection::insert_entry`].
    pub async fn insert_entry(&self, key: impl Into<String>, value: Value) -> CoreResult<Value> {
        let key = key.into();
        self.core
            .mutate("insert_entry", |doc| ops::insert_entry(doc, key, value))
            .await
    }

    /// See [`Collection::update`].
    pub async fn update(&self, key: impl Into<Key>, partial: Value) -> CoreResult<Option<Value>> {
        let key = key.into();
        self.core
            .mutate("update", |doc| ops::update(doc, &key, partial))
            .await
    }

    /// See [`Collection::remove`].
    pub async fn remove(&self, key: impl Into<Key>) -> CoreResult<bool> {
        let key = key.into();
        self.core
            .mutate("remove", |doc| Ok(ops::remove(doc, &key)))
            .await
    }

    /// See [`Collection::upsert`].
    pub async fn upsert(&self, query: impl Into<Query>, partial: Value) -> CoreResult<Value> {
        let query = query.into();
        self.core
            .mutate("upsert", |doc| ops::upsert(doc, &query, partial))
            .await
    }

    /// See [`Collection::clear`].
    pub async fn clear(&self) -> CoreResult<()> {
        self.core.mutate("clear", |doc| Ok(ops::clear(doc))).await
    }

    /// See [`Collection::clear_as_map`].
    pub async fn clear_as_map(&self) -> CoreResult<()> {
        self.core
            .mutate("clear_as_map", |doc| Ok(ops::clear_as_map(doc)))
            .await
    }

    /// See [`Collection::delete`].
    pub async fn delete(&self) -> CoreResult<bool> {
        self.core.delete().await
    }

    /// See [`Collection::set_in`].
    pub async fn set_in(&self, path: &str, value: Value) -> CoreResult<()> {
        let path = Path::parse(path)?;
        self.core
            .mutate("set_in", |doc| ops::set_in(doc, &path, value))
            .await
    }

    /// See [`Collection::merge_in`].
    pub async fn merge_in(&self, path: &str, value: Value) -> CoreResult<Value> {
        let path = Path::parse(path)?;
        self.core
            .mutate("merge_in", |doc| ops::merge_in(doc, &path, value))
            .await
    }

    /// See [`Collection::push_in`].
    pub async fn push_in(&self, path: &str, value: Value) -> CoreResult<usize> {
        let path = Path::parse(path)?;
        self.core
            .mutate("push_in", |doc| ops::push_in(doc, &path, value))
            .await
    }

    /// See [`Collection::pull_in`].
    pub async fn pull_in(&self, path: &str, query: impl Into<Query>) -> CoreResult<Vec<Value>> {
        let path = Path::parse(path)?;
        let query = query.into();
        self.core
            .mutate("pull_in", |doc| ops::pull_in(doc, &path, &query))
            .await
    }

    /// See [`Collection::delete_in`].
    pub async fn delete_in(&self, path: &str) -> CoreResult<bool> {
        let path = Path::parse(path)?;
        self.core
            .mutate("delete_in", |doc| ops::delete_in(doc, &path))
            .await
    }

    /// See [`Collection::update_in`].
    pub async fn update_in<F>(&self, path: &str, updater: F) -> CoreResult<Value>
    where
        F: FnOnce(Option<Value>) -> Value + Send,
    {
        let path = Path::parse(path)?;
        self.core
            .mutate("update_in", |doc| ops::update_in(doc, &path, updater))
            .await
    }
}

impl From<Collection> for AsyncCollection {
    fn from(collection: Collection) -> Self {
        collection.to_async()
    }
}
