//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use proptest::prelude::*;
use serde_json::{Map, Value};

/// Strategy for generating valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_-]{0,31}").expect("Invalid regex")
}

/// Strategy for generating JSON scalars that survive a text round-trip.
pub fn json_leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        // quarters are exact in binary, so they print and parse back unchanged
        (-4000i32..4000).prop_map(|n| Value::from(f64::from(n) / 4.0)),
        "[a-zA-Z0-9 _.-]{0,16}".prop_map(Value::String),
    ]
}

/// Strategy for generating arbitrary nested JSON values.
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    json_leaf_strategy().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..6)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Strategy for generating records without an `id`.
pub fn record_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,8}", json_value_strategy()), 0..6).prop_map(|pairs| {
        let mut record: Map<String, Value> = pairs.into_iter().collect();
        record.shift_remove("id");
        Value::Object(record)
    })
}

/// Strategy for generating dot-notation paths of object keys.
pub fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,6}", 1..4).prop_map(|segments| segments.join("."))
}

/// A single collection operation for model-based tests.
#[derive(Debug, Clone)]
pub enum RecordOperation {
    /// Insert a record
    Insert {
        /// Record content
        record: Value,
    },
    /// Deep-merge into a record
    Update {
        /// Target id
        id: u64,
        /// Partial record
        partial: Value,
    },
    /// Remove a record
    Remove {
        /// Target id
        id: u64,
    },
    /// Look up a record
    Get {
        /// Target id
        id: u64,
    },
}

/// Strategy for generating record operations. Ids are kept small so that
/// updates and removals regularly hit existing records.
pub fn record_operation_strategy() -> impl Strategy<Value = RecordOperation> {
    prop_oneof![
        3 => record_strategy().prop_map(|record| RecordOperation::Insert { record }),
        2 => (1u64..16, record_strategy())
            .prop_map(|(id, partial)| RecordOperation::Update { id, partial }),
        1 => (1u64..16).prop_map(|id| RecordOperation::Remove { id }),
        2 => (1u64..16).prop_map(|id| RecordOperation::Get { id }),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<RecordOperation>> {
    prop::collection::vec(record_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
