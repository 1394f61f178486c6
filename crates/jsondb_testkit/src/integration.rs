//! Cross-crate integration test helpers.
//!
//! Provides a harness that mirrors an array-mode collection in memory
//! and checks every result against that model.

use crate::fixtures::TestDatabase;
use crate::generators::RecordOperation;
use jsondb_core::{deep_merge, Collection, Document, Query};
use serde_json::Value;

/// A test harness for model-based testing of one collection.
pub struct IntegrationHarness {
    /// The database instance.
    pub db: TestDatabase,
    /// The collection under test.
    collection: Collection,
    /// Expected records, in storage order.
    model: Vec<Value>,
}

impl IntegrationHarness {
    /// Creates a harness over an empty collection named `model`.
    pub fn new() -> Self {
        let db = TestDatabase::new();
        let collection = db.collection("model").expect("Failed to open collection");
        Self {
            db,
            collection,
            model: Vec::new(),
        }
    }

    /// The collection under test.
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.model.iter().position(|r| r["id"] == id)
    }

    fn next_id(&self) -> u64 {
        self.model
            .iter()
            .filter_map(|r| r["id"].as_u64())
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Inserts a record and tracks it.
    pub fn insert(&mut self, record: Value) -> Value {
        let expected_id = self.next_id();
        let stored = self.collection.insert(record).expect("Failed to insert record");
        assert_eq!(stored["id"], expected_id, "ids must be max + 1");
        self.model.push(stored.clone());
        stored
    }

    /// Updates a record and checks the merged result.
    pub fn update(&mut self, id: u64, partial: Value) -> Option<Value> {
        let actual = self
            .collection
            .update(id, partial.clone())
            .expect("Failed to update record");

        let expected = self.position(id).map(|i| {
            let mut partial = partial;
            if let Some(fields) = partial.as_object_mut() {
                fields.shift_remove("id");
            }
            deep_merge(&mut self.model[i], partial);
            self.model[i].clone()
        });
        assert_eq!(actual, expected, "update mismatch for id {id}");
        actual
    }

    /// Removes a record and updates tracking.
    pub fn remove(&mut self, id: u64) -> bool {
        let removed = self.collection.remove(id).expect("Failed to remove record");
        let expected = self.position(id).map(|i| self.model.remove(i)).is_some();
        assert_eq!(removed, expected, "remove mismatch for id {id}");
        removed
    }

    /// Gets a record and verifies it matches the tracked value.
    pub fn get_and_verify(&self, id: u64) -> Option<Value> {
        let actual = self.collection.find_by_id(id).expect("Failed to get record");
        let expected = self.position(id).map(|i| self.model[i].clone());
        assert_eq!(actual, expected, "record mismatch for id {id}");
        actual
    }

    /// Applies one generated operation.
    pub fn apply(&mut self, operation: RecordOperation) {
        match operation {
            RecordOperation::Insert { record } => {
                self.insert(record);
            }
            RecordOperation::Update { id, partial } => {
                self.update(id, partial);
            }
            RecordOperation::Remove { id } => {
                self.remove(id);
            }
            RecordOperation::Get { id } => {
                self.get_and_verify(id);
            }
        }
    }

    /// Verifies the stored collection equals the model.
    pub fn verify_all(&self) {
        let stored = self.collection.get(Query::all()).expect("Failed to read collection");
        assert_eq!(
            stored,
            Document::Array(self.model.clone()),
            "collection content mismatch"
        );
    }

    /// Returns the count of tracked records.
    pub fn tracked_count(&self) -> usize {
        self.model.len()
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Test codec/storage integration.
pub mod codec_storage {
    use super::*;
    use jsondb_core::Database;

    /// Verifies that a value stored at `path` reads back unchanged, both
    /// through the collection and by decoding the raw file.
    pub fn test_encode_store_retrieve(db: &TestDatabase, path: &str, value: Value) {
        let collection = db.collection("roundtrip").expect("Failed to open collection");
        collection.set_in(path, value.clone()).expect("Failed to set value");

        let retrieved = collection.get_in(path).expect("Failed to get value");
        assert_eq!(retrieved.as_ref(), Some(&value), "value should read back");

        let raw = db.read_file("roundtrip");
        let decoded = jsondb_codec::decode(raw.as_bytes()).expect("Failed to decode file");
        assert_eq!(decoded, collection.values().expect("Failed to read"));
    }

    /// Verifies that calls conflicting with the committed mode are rejected
    /// and leave the file unchanged.
    pub fn test_mode_mismatch(db: &Database) {
        let records = db.collection("records_mode").expect("Failed to open collection");
        records.insert(serde_json::json!({"n": 1})).expect("Failed to insert");
        let err = records
            .insert_entry("key", Value::Null)
            .expect_err("map write on array collection must fail");
        assert!(err.is_shape());

        let entries = db.collection("map_mode").expect("Failed to open collection");
        entries.insert_entry("key", Value::Null).expect("Failed to insert entry");
        let err = entries
            .insert(serde_json::json!({}))
            .expect_err("record insert on map collection must fail");
        assert!(err.is_shape());
        assert_eq!(entries.count(Query::all()).expect("Failed to count"), 1);
    }
}

/// Test blocking and async handles working together.
pub mod mixed_handles {
    use super::*;
    use jsondb_core::Database;

    /// Inserts through both handle kinds on one collection and checks that
    /// every id is unique.
    pub async fn test_mixed_inserts(db: &Database, per_kind: usize) {
        let blocking = db.collection("mixed").expect("Failed to open collection");
        let nonblocking = blocking.to_async();

        let worker = tokio::task::spawn_blocking(move || {
            for i in 0..per_kind {
                blocking
                    .insert(serde_json::json!({"from": "blocking", "i": i}))
                    .expect("Failed to insert");
            }
        });
        for i in 0..per_kind {
            nonblocking
                .insert(serde_json::json!({"from": "async", "i": i}))
                .await
                .expect("Failed to insert");
        }
        worker.await.expect("Blocking worker panicked");

        let mut ids: Vec<u64> = nonblocking
            .keys()
            .await
            .expect("Failed to read keys")
            .iter()
            .filter_map(|k| k.as_id())
            .collect();
        ids.sort_unstable();
        let expected: Vec<u64> = (1..=(2 * per_kind) as u64).collect();
        assert_eq!(ids, expected);
    }
}
