//! # JsonDB Codec
//!
//! Converts collection documents to and from their on-disk JSON text.
//!
//! A collection file holds exactly one of:
//! - the absent sentinel `null` (never written),
//! - a JSON array of records (array mode),
//! - a JSON object (map mode).
//!
//! Decoding keeps these three cases apart. A file that does not parse, or
//! that holds a top-level scalar, is reported as an error rather than being
//! read as an empty collection.
//!
//! ## Usage
//!
//! ```
//! use jsondb_codec::{decode, encode, Document, Encoding};
//! use serde_json::json;
//!
//! let doc = Document::Array(vec![json!({"id": 1, "name": "Bulbasaur"})]);
//! let bytes = encode(&doc, Encoding::Pretty).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), doc);
//!
//! assert_eq!(decode(b"null").unwrap(), Document::Absent);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod document;
mod encoder;
mod error;

pub use decoder::decode;
pub use document::{type_name, Document, Shape, ABSENT_SENTINEL};
pub use encoder::{encode, Encoding};
pub use error::{CodecError, CodecResult};
pub use serde_json::{Map, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            (-4000i32..4000).prop_map(|n| json!(f64::from(n) / 4.0)),
            "[a-zA-Z0-9 ]{0,12}".prop_map(Value::String),
        ]
    }

    fn json_value() -> impl Strategy<Value = Value> {
        leaf().prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn arbitrary_records_survive_disk_format(
            records in prop::collection::vec(json_value(), 0..6),
            pretty in any::<bool>(),
        ) {
            let encoding = if pretty { Encoding::Pretty } else { Encoding::Compact };
            let doc = Document::Array(records);
            let bytes = encode(&doc, encoding).unwrap();
            prop_assert_eq!(decode(&bytes).unwrap(), doc);
        }
    }
}
