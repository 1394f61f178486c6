//! Document encoder.

use crate::document::{Document, ABSENT_SENTINEL};
use crate::error::{CodecError, CodecResult};

/// Text layout of an encoded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Two-space indented JSON, readable by humans.
    #[default]
    Pretty,
    /// Single-line JSON.
    Compact,
}

/// Encode a document to its on-disk bytes.
///
/// `Absent` always encodes to the sentinel regardless of `encoding`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(document: &Document, encoding: Encoding) -> CodecResult<Vec<u8>> {
    if document.is_absent() {
        return Ok(ABSENT_SENTINEL.to_vec());
    }

    let result = match encoding {
        Encoding::Pretty => serde_json::to_vec_pretty(document),
        Encoding::Compact => serde_json::to_vec(document),
    };

    result.map_err(|e| CodecError::encoding_failed(e.to_string()))
}
