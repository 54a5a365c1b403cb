use async_trait::async_trait;
use mq_producer::{Envelope, Error, QueueBackend, Receipt, Result, SendCallback};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Installs a test subscriber so producer tracing shows up with --nocapture.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// In-memory backend double for driving the producer through every strategy
/// without a broker.
pub struct FakeBackend {
    receipts: Vec<Receipt>,
    start_error: Option<String>,
    send_error: Option<String>,
    stop_error: Option<String>,
    drop_callback: bool,
    send_delay: Duration,
    async_delay: Duration,
    /// Every envelope handed to send/send_async, in dispatch order.
    pub sent: Mutex<Vec<Envelope>>,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    /// Set by the fake just before it invokes an async completion callback.
    pub callback_fired: Arc<AtomicBool>,
}

impl FakeBackend {
    pub fn new() -> Self {
        init_tracing();
        Self {
            receipts: vec![Receipt::new("msg-1")],
            start_error: None,
            send_error: None,
            stop_error: None,
            drop_callback: false,
            send_delay: Duration::ZERO,
            async_delay: Duration::ZERO,
            sent: Mutex::new(Vec::new()),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            callback_fired: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_receipt_ids(mut self, ids: &[&str]) -> Self {
        self.receipts = ids.iter().map(|id| Receipt::new(*id)).collect();
        self
    }

    pub fn failing_start(mut self, message: &str) -> Self {
        self.start_error = Some(message.to_string());
        self
    }

    pub fn failing_send(mut self, message: &str) -> Self {
        self.send_error = Some(message.to_string());
        self
    }

    pub fn failing_stop(mut self, message: &str) -> Self {
        self.stop_error = Some(message.to_string());
        self
    }

    /// Makes send_async drop its completion callback without invoking it.
    pub fn dropping_callback(mut self) -> Self {
        self.drop_callback = true;
        self
    }

    pub fn with_send_delay(mut self, delay: Duration) -> Self {
        self.send_delay = delay;
        self
    }

    pub fn with_async_delay(mut self, delay: Duration) -> Self {
        self.async_delay = delay;
        self
    }

    pub fn last_sent(&self) -> Envelope {
        self.sent
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no envelope was dispatched")
    }

    fn outcome(&self) -> Result<Vec<Receipt>> {
        match &self.send_error {
            Some(message) => Err(Error::Send(message.clone())),
            None => Ok(self.receipts.clone()),
        }
    }
}

#[async_trait]
impl QueueBackend for FakeBackend {
    async fn start(&self) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        match &self.start_error {
            Some(message) => Err(Error::Connection(message.clone())),
            None => Ok(()),
        }
    }

    async fn send(&self, envelope: &Envelope) -> Result<Vec<Receipt>> {
        self.sent.lock().unwrap().push(envelope.clone());
        if !self.send_delay.is_zero() {
            tokio::time::sleep(self.send_delay).await;
        }
        self.outcome()
    }

    fn send_async(&self, envelope: Envelope, on_complete: SendCallback) {
        self.sent.lock().unwrap().push(envelope);
        if self.drop_callback {
            drop(on_complete);
            return;
        }
        let outcome = self.outcome();
        let delay = self.async_delay;
        let fired = Arc::clone(&self.callback_fired);
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            fired.store(true, Ordering::SeqCst);
            on_complete(outcome);
        });
    }

    async fn graceful_stop(&self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        match &self.stop_error {
            Some(message) => Err(Error::Connection(message.clone())),
            None => Ok(()),
        }
    }
}
