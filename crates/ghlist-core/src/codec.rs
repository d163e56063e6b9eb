//! JSON encoding and decoding for domain records.
//!
//! Everything that crosses the network or lands in the local store goes
//! through these helpers so that decode failures carry one error type.

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to decode JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Serialize a value to compact JSON bytes
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(CodecError::Encode)
}

/// Deserialize JSON bytes into a value
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

/// Treat an explicit `null` the same as a missing field.
///
/// Pair with `#[serde(default)]` so both absent and `null` fall back to
/// `T::default()`. The GitHub API sends `null` for unset strings like `bio`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
