pub mod kafka;

pub use kafka::KafkaBackend;

use crate::message::{Envelope, Receipt};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Completion callback handed to [`QueueBackend::send_async`]. Invoked exactly
/// once, from an execution context the backend owns.
pub type SendCallback = Box<dyn FnOnce(Result<Vec<Receipt>>) + Send + 'static>;

/// Contract consumed from the underlying messaging client.
///
/// The producer layer never retries or wraps: whatever a backend method
/// returns is surfaced verbatim to the caller. A backend must be safe for
/// concurrent use by multiple in-flight sends.
#[async_trait]
pub trait QueueBackend: Send + Sync {
    /// Establishes the connection. Must be called before any send; an empty
    /// topic set is rejected here, not earlier.
    async fn start(&self) -> Result<()>;

    /// Dispatches one envelope and blocks until the backend acknowledges it
    /// with an ordered sequence of receipts.
    async fn send(&self, envelope: &Envelope) -> Result<Vec<Receipt>>;

    /// Schedules one envelope for dispatch and returns immediately. The
    /// backend invokes `on_complete` exactly once when the send finishes.
    fn send_async(&self, envelope: Envelope, on_complete: SendCallback);

    /// Releases all backend resources. Terminal; the backend must not be
    /// used afterwards.
    async fn graceful_stop(&self) -> Result<()>;
}

#[async_trait]
impl<B: QueueBackend + ?Sized> QueueBackend for Arc<B> {
    async fn start(&self) -> Result<()> {
        (**self).start().await
    }

    async fn send(&self, envelope: &Envelope) -> Result<Vec<Receipt>> {
        (**self).send(envelope).await
    }

    fn send_async(&self, envelope: Envelope, on_complete: SendCallback) {
        (**self).send_async(envelope, on_complete)
    }

    async fn graceful_stop(&self) -> Result<()> {
        (**self).graceful_stop().await
    }
}
