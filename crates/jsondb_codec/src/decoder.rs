//! Document decoder.

use crate::document::{type_name, Document};
use crate::error::{CodecError, CodecResult};
use serde_json::Value;

/// Decode on-disk bytes into a document.
///
/// The sentinel `null` and whitespace-only content decode to
/// [`Document::Absent`]. A top-level array or object decodes to the
/// matching mode. Anything else is an error: a corrupt file is never
/// treated as an empty collection.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] for unparsable bytes and
/// [`CodecError::UnexpectedShape`] for a top-level scalar.
pub fn decode(bytes: &[u8]) -> CodecResult<Document> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::Absent);
    }

    let value: Value = serde_json::from_slice(bytes)?;
    Document::from_value(value).map_err(|other| CodecError::UnexpectedShape {
        found: type_name(&other),
    })
}
