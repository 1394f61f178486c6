//! Benchmark utilities.

use jsondb_codec::Document;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{json, Value};

/// Generate a random alphanumeric string of the specified length.
pub fn random_text(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a record without an `id` whose payload has the specified size.
pub fn random_record(payload_size: usize) -> Value {
    let mut rng = rand::thread_rng();
    json!({
        "name": random_text(12),
        "level": rng.gen_range(1..100),
        "stats": {"hp": rng.gen_range(1..255), "atk": rng.gen_range(1..255)},
        "payload": random_text(payload_size),
    })
}

/// Generate records without ids.
pub fn generate_records(count: usize, payload_size: usize) -> Vec<Value> {
    (0..count).map(|_| random_record(payload_size)).collect()
}

/// Generate an array-mode document with ids `1..=count`.
pub fn generate_document(count: usize, payload_size: usize) -> Document {
    let records = generate_records(count, payload_size)
        .into_iter()
        .enumerate()
        .map(|(i, mut record)| {
            record["id"] = json!(i + 1);
            record
        })
        .collect();
    Document::Array(records)
}
