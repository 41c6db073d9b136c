//! Document codec.
//!
//! Documents are encoded as JSON byte strings. Failures carry the collection
//! name so a malformed record can be traced back to where it lives.

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode a document for storage.
pub fn encode_document<T: Serialize>(collection: &str, doc: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(doc).map_err(|e| Error::json(collection, e))
}

/// Decode a stored record into a document.
pub fn decode_document<T: DeserializeOwned>(collection: &str, bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::json(collection, e))
}
