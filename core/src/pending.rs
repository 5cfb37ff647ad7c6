//! Single-shot bridge from a completion callback to a `Future`.
//!
//! # Design
//! `pending()` returns a `Completion` and a `Pending`. The completion is handed
//! to whatever finishes the work (a transport callback); the pending side is
//! returned to the caller. `Completion::complete` takes `self`, so a result can
//! be delivered at most once. A completion dropped without a result fails the
//! future with `TransportError::Abandoned` rather than leaving it pending
//! forever.
//!
//! Dropping the `Pending` is the only form of cancellation. The work already
//! in flight is not interrupted, but its result is discarded.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{ApiError, TransportError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Create a linked completion / future pair.
pub fn pending<T>() -> (Completion<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();
    (Completion { tx }, Pending { rx })
}

/// Write side of a pending operation.
#[derive(Debug)]
pub struct Completion<T> {
    tx: oneshot::Sender<ApiResult<T>>,
}

impl<T> Completion<T> {
    /// Resolve the paired `Pending`. A no-op if it has already been dropped.
    pub fn complete(self, result: ApiResult<T>) {
        if self.tx.send(result).is_err() {
            tracing::trace!("pending operation dropped before completion");
        }
    }

    /// True once the paired `Pending` has been dropped.
    pub fn is_cancelled(&self) -> bool {
        self.tx.is_closed()
    }
}

/// The eventual result of one request.
#[derive(Debug)]
#[must_use = "a Pending does nothing useful unless awaited or waited on"]
pub struct Pending<T> {
    rx: oneshot::Receiver<ApiResult<T>>,
}

impl<T> Pending<T> {
    /// An already-resolved operation.
    pub fn ready(result: ApiResult<T>) -> Self {
        let (completion, pending) = pending();
        completion.complete(result);
        pending
    }

    /// Block the current thread until the operation resolves.
    ///
    /// # Panics
    /// Panics when called from inside an async runtime; `.await` there instead.
    pub fn blocking_wait(self) -> ApiResult<T> {
        self.rx
            .blocking_recv()
            .unwrap_or_else(|_| Err(TransportError::Abandoned.into()))
    }
}

impl<T> Future for Pending<T> {
    type Output = ApiResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(TransportError::Abandoned.into())),
            Poll::Pending => Poll::Pending,
        }
    }
}
