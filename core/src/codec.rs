//! JSON encoding of request bodies and decoding of response bodies.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, DeserializationError};

/// Decode `text` as `T`. On failure the input text is kept in the error.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, DeserializationError> {
    serde_json::from_str(text).map_err(|source| DeserializationError {
        body: text.to_string(),
        source,
    })
}

/// Decode a raw response body as `T`.
///
/// A body that is not UTF-8 fails before JSON parsing; the error then carries
/// a lossy copy of the body.
pub fn decode_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DeserializationError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => decode(text),
        Err(e) => Err(DeserializationError {
            body: String::from_utf8_lossy(bytes).into_owned(),
            source: serde::de::Error::custom(format_args!("response body is not valid UTF-8: {e}")),
        }),
    }
}

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(ApiError::Serialization)
}
