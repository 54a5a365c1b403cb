//! Error types and result handling for mq-producer.
//!
//! This module defines the main error type [`Error`] and a convenience
//! [`Result`] type alias used throughout the crate.
//!
//! # Example
//!
//! ```rust
//! use mq_producer::{Error, Result};
//!
//! fn start_producer() -> Result<()> {
//!     // Simulating a connection error
//!     Err(Error::Connection("Failed to reach broker".to_string()))
//! }
//!
//! match start_producer() {
//!     Ok(()) => println!("Started"),
//!     Err(Error::Connection(msg)) => eprintln!("Connection error: {}", msg),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for mq-producer operations.
///
/// Every backend-reported failure propagates through one of these variants
/// unmodified; no layer in this crate wraps, retries, or suppresses.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, typically from an invalid config file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Kafka client or producer error.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// Generic connection error not covered by specific types.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Per-call send failure reported by the backend.
    #[error("Send error: {0}")]
    Send(String),

    /// The backend acknowledged a send with zero receipts, so no message
    /// identifier can be extracted.
    #[error("Backend returned no receipt for an acknowledged send")]
    EmptyReceipt,

    /// The async completion callback was dropped before it reported an
    /// outcome. The send may or may not have reached the broker.
    #[error("Send completion callback was dropped before reporting a result")]
    CallbackDropped,

    /// Operation exceeded the configured send timeout.
    #[error("Timeout error: {message}")]
    Timeout {
        /// Description of what timed out
        message: String,
    },
}

/// A convenient Result type alias for mq-producer operations.
///
/// This is equivalent to `std::result::Result<T, mq_producer::Error>`.
///
/// # Example
///
/// ```rust
/// use mq_producer::Result;
///
/// fn do_something() -> Result<String> {
///     Ok("Success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
