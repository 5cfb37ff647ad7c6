//! Typed JSON over HTTP with a future-style return value.
//!
//! # Overview
//! `get*` and `post*` issue one HTTP request each and return a `Pending<T>`
//! immediately. The request runs on a worker thread; when it finishes, the
//! response body is decoded into `T` and the `Pending` resolves exactly once.
//!
//! # Design
//! - `RequestDescriptor` builds the URL (query string included) and headers.
//! - `Transport` performs the round-trip; `UreqTransport` is the one
//!   implementation.
//! - `codec` holds JSON encode/decode; decode errors keep the raw body, and
//!   bodies that are not UTF-8 fail as decode errors too.
//! - `pending` bridges the transport's completion callback to a `Future`.
//! - No retries, timeouts or cancellation beyond dropping the `Pending`.

pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod pending;
pub mod query;
pub mod request;
pub mod transport;

pub use client::{get, get_with_headers, get_with_query, post, post_json, post_with_headers, Headers, WebApiClient};
pub use codec::{decode, decode_bytes, encode};
pub use error::{ApiError, DeserializationError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pending::{pending, ApiResult, Completion, Pending};
pub use query::{Query, QueryParams};
pub use request::RequestDescriptor;
pub use transport::{dispatch, Transport, UreqTransport};
