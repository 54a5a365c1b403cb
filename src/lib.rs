pub mod config;
pub mod error;
pub mod message;
pub mod producer;

pub mod backend;

pub use backend::{KafkaBackend, QueueBackend, SendCallback};
pub use config::{ProducerConfig, ProducerConfigBuilder};
pub use error::{Error, Result};
pub use message::{Envelope, Receipt};
pub use producer::Producer;
