//! Error types returned through a failed `Pending`.
//!
//! # Design
//! There are two failure kinds a caller acts on. A `TransportError` means no
//! usable response arrived. A `DeserializationError` means a response arrived
//! but its body does not fit the requested type. The raw body stays attached
//! to the decode error so the caller can see what the server actually sent.

use thiserror::Error;

/// Errors surfaced by every `get*` / `post*` operation.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Deserialization(#[from] DeserializationError),

    /// The request object passed to `post_json` could not be encoded.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl ApiError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn is_deserialization(&self) -> bool {
        matches!(self, ApiError::Deserialization(_))
    }
}

/// Failures of the network round-trip itself.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connect, DNS, TLS, I/O or URL failure reported by the HTTP client.
    #[error("request to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {url}: {body}")]
    Status { url: String, status: u16, body: String },

    /// The worker thread for the request could not be started.
    #[error("failed to start request worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The completion side was dropped without delivering a result.
    #[error("request completed without a result")]
    Abandoned,
}

/// The response body is not valid JSON for the requested type.
#[derive(Debug, Error)]
#[error("failed to deserialize server response: {body}")]
pub struct DeserializationError {
    /// Response text exactly as received.
    pub body: String,
    #[source]
    pub source: serde_json::Error,
}
