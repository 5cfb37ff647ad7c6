//! Network I/O behind a single `Transport` trait.
//!
//! # Design
//! `Transport::execute` is a plain blocking call. `dispatch` runs it on a
//! dedicated worker thread and reports the outcome through a one-shot
//! callback, which is how the facade turns a request into a `Pending`.
//! `UreqTransport` builds a fresh agent per call, so every request uses its own
//! connection and nothing is shared between calls.

use std::sync::Arc;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations return non-2xx responses as data and hand back the body
/// bytes untouched; interpreting status and body is left to the caller.
pub trait Transport: Send + Sync + 'static {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Run `request` on a worker thread and invoke `on_complete` exactly once.
///
/// Returns immediately. If the worker cannot be spawned, `on_complete` is
/// called on the current thread with `TransportError::Spawn`.
pub fn dispatch<F>(transport: Arc<dyn Transport>, request: HttpRequest, on_complete: F)
where
    F: FnOnce(Result<HttpResponse, TransportError>) + Send + 'static,
{
    // The closure is parked in a shared slot so it survives a failed spawn.
    let slot = Arc::new(std::sync::Mutex::new(Some(on_complete)));
    let worker_slot = Arc::clone(&slot);

    let spawned = std::thread::Builder::new()
        .name("webapi-request".to_string())
        .spawn(move || {
            let outcome = transport.execute(&request);
            if let Some(callback) = take(&worker_slot) {
                callback(outcome);
            }
        });

    if let Err(e) = spawned {
        if let Some(callback) = take(&slot) {
            callback(Err(TransportError::Spawn(e)));
        }
    }
}

fn take<F>(slot: &std::sync::Mutex<Option<F>>) -> Option<F> {
    match slot.lock() {
        Ok(mut guard) => guard.take(),
        Err(poisoned) => poisoned.into_inner().take(),
    }
}

/// `Transport` backed by a blocking `ureq` agent.
#[derive(Debug, Clone, Default)]
pub struct UreqTransport;

impl UreqTransport {
    pub fn new() -> Self {
        Self
    }

    fn agent() -> ureq::Agent {
        ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = Self::agent();
        let connection_error = |e: ureq::Error| TransportError::Connection {
            url: request.url.clone(),
            source: Box::new(e),
        };

        let result = match request.method {
            HttpMethod::Get => {
                let mut builder = agent.get(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post => {
                let mut builder = agent.post(&request.url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(connection_error)?;
        let status = response.status().as_u16();
        // No size cap: the whole body is handed to the decoder.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(connection_error)?;

        Ok(HttpResponse { status, body })
    }
}
