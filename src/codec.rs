//! Payload codec.
//!
//! Payloads are stored as JSON text. Anything serde can represent as JSON
//! round-trips through the store: numbers, strings (including non-ASCII),
//! booleans, null, nested sequences and string-keyed maps. Key order inside
//! maps is not guaranteed to survive the encode/store/decode cycle.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Encode a payload to its stored form.
pub fn encode<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_string(value)?)
}

/// Decode a stored payload.
///
/// A payload that does not decode as `T` is a corruption-class failure and
/// propagates to the caller.
pub fn decode<T>(encoded: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(encoded)?)
}
