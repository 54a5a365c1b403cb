//! Producer lifecycle and the four send strategies.
//!
//! A [`Producer`] is created once via [`Producer::connect`] (which constructs
//! and starts the backend), used for any number of send calls, and destroyed
//! once via [`Producer::stop`]. Stop consumes the producer, so use-after-stop
//! and stop-without-start are unrepresentable.
//!
//! # Example
//!
//! ```rust,no_run
//! use mq_producer::{Producer, ProducerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProducerConfig::builder()
//!         .endpoint("broker:9092")
//!         .topics(["orders"])
//!         .group("billing")
//!         .build();
//!
//!     let producer = Producer::connect(config).await?;
//!     let id = producer.send_normal("orders", "created", "hello").await?;
//!     println!("sent {}", id);
//!     producer.stop().await?;
//!     Ok(())
//! }
//! ```

use crate::backend::{KafkaBackend, QueueBackend};
use crate::config::ProducerConfig;
use crate::message::{Envelope, Receipt};
use crate::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::future::Future;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// A started connection to the messaging backend.
pub struct Producer<B: QueueBackend = KafkaBackend> {
    backend: B,
    config: ProducerConfig,
}

impl Producer<KafkaBackend> {
    /// Constructs a Kafka backend from `config` and starts it. Failure in
    /// either step aborts; the caller receives no usable producer.
    pub async fn connect(config: ProducerConfig) -> Result<Self> {
        let backend = KafkaBackend::new(&config)?;
        Self::start_with(backend, config).await
    }
}

impl<B: QueueBackend> Producer<B> {
    /// Starts an already-constructed backend. The seam for alternative
    /// backends; [`Producer::connect`] goes through here too.
    pub async fn start_with(backend: B, config: ProducerConfig) -> Result<Self> {
        backend.start().await?;
        info!(group = %config.group, "producer started");
        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    /// Sends one message and blocks until the backend acknowledges it.
    pub async fn send_normal(
        &self,
        topic: &str,
        tag: &str,
        body: impl Into<Bytes>,
    ) -> Result<String> {
        let envelope = Envelope::builder(topic, body).tag(tag).build();
        self.dispatch(envelope).await
    }

    /// Sends one message through the backend's callback-style API, bridging
    /// the completion back to the caller so the contract stays blocking.
    ///
    /// The bridge is a fresh single-slot rendezvous channel per call: the
    /// backend's callback moves the outcome into the sender exactly once and
    /// the caller awaits the receiver, so the result cannot be observed
    /// before the callback fires.
    pub async fn send_async(
        &self,
        topic: &str,
        tag: &str,
        body: impl Into<Bytes>,
    ) -> Result<String> {
        let envelope = Envelope::builder(topic, body).tag(tag).build();
        debug!(topic = %envelope.topic, "dispatching via async backend API");

        let (tx, rx) = oneshot::channel();
        self.backend.send_async(
            envelope,
            Box::new(move |outcome| {
                // Receiver may be gone if the caller timed out; nothing to do.
                let _ = tx.send(outcome);
            }),
        );

        let receipts = self
            .await_with_deadline("async send", async move {
                rx.await.map_err(|_| Error::CallbackDropped)?
            })
            .await?;

        last_message_id(receipts)
    }

    /// Sends one message stamped with the configured ordering key, so the
    /// backend delivers it in order relative to other FIFO sends.
    pub async fn send_fifo(
        &self,
        topic: &str,
        tag: &str,
        body: impl Into<Bytes>,
    ) -> Result<String> {
        let envelope = Envelope::builder(topic, body)
            .tag(tag)
            .ordering_key(self.config.ordering_group.clone())
            .build();
        self.dispatch(envelope).await
    }

    /// Sends one message carrying a target delivery timestamp.
    pub async fn send_delayed(
        &self,
        topic: &str,
        tag: &str,
        body: impl Into<Bytes>,
        deliver_at: DateTime<Utc>,
    ) -> Result<String> {
        let envelope = Envelope::builder(topic, body)
            .tag(tag)
            .deliver_at(deliver_at)
            .build();
        self.dispatch(envelope).await
    }

    /// Releases the backend connection. Terminal; the producer is consumed.
    pub async fn stop(self) -> Result<()> {
        info!(group = %self.config.group, "stopping producer");
        self.backend.graceful_stop().await
    }

    async fn dispatch(&self, envelope: Envelope) -> Result<String> {
        debug!(topic = %envelope.topic, "dispatching envelope");
        let receipts = self
            .await_with_deadline("send", self.backend.send(&envelope))
            .await?;
        last_message_id(receipts)
    }

    async fn await_with_deadline<T>(
        &self,
        what: &str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match self.config.send_timeout() {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout {
                    message: format!("{} did not complete within {:?}", what, limit),
                }),
            },
            None => fut.await,
        }
    }
}

/// Extracts the identifier of the last receipt in the backend's response.
///
/// Multi-receipt responses discard all but the last identifier. Single-receipt
/// topology is assumed; the truncation is logged so batch-style backends are
/// not silently lossy.
fn last_message_id(mut receipts: Vec<Receipt>) -> Result<String> {
    if receipts.len() > 1 {
        warn!(
            discarded = receipts.len() - 1,
            "multi-receipt response, keeping only the last identifier"
        );
    }
    receipts
        .pop()
        .map(|receipt| receipt.message_id)
        .ok_or(Error::EmptyReceipt)
}
