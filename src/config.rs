use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Finalized producer configuration.
///
/// Build one with [`ProducerConfig::builder`] or load it from a file with
/// [`ProducerConfig::from_file`]. The value is immutable once handed to
/// connection construction.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProducerConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default = "default_ordering_group")]
    pub ordering_group: String,
    #[serde(default)]
    pub send_timeout_ms: Option<u64>,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            topics: Vec::new(),
            group: String::new(),
            debug_logging: false,
            ordering_group: default_ordering_group(),
            send_timeout_ms: None,
        }
    }
}

impl ProducerConfig {
    pub fn builder() -> ProducerConfigBuilder {
        ProducerConfigBuilder::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("MQ_PRODUCER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn send_timeout(&self) -> Option<Duration> {
        self.send_timeout_ms.map(Duration::from_millis)
    }
}

/// Builder for [`ProducerConfig`].
///
/// Setters apply in call order and each one overwrites the field it names, so
/// a later call to the same setter wins. No validation happens here; an empty
/// endpoint or topic set only fails once connection start is attempted.
#[derive(Debug, Clone, Default)]
pub struct ProducerConfigBuilder {
    config: ProducerConfig,
}

impl ProducerConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Sets the access key and secret key together.
    pub fn credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.config.access_key = access_key.into();
        self.config.secret_key = secret_key.into();
        self
    }

    /// Replaces the entire topic set.
    pub fn topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.config.group = group.into();
        self
    }

    /// Enables client-scoped debug diagnostics on the backend client.
    pub fn debug_logging(mut self, enabled: bool) -> Self {
        self.config.debug_logging = enabled;
        self
    }

    /// Sets the ordering key stamped on every FIFO send.
    pub fn ordering_group(mut self, group: impl Into<String>) -> Self {
        self.config.ordering_group = group.into();
        self
    }

    /// Bounds how long any send strategy waits for the backend. Unset means
    /// the caller blocks until the backend responds. Durations beyond u64
    /// milliseconds saturate.
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.config.send_timeout_ms =
            Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn build(self) -> ProducerConfig {
        self.config
    }
}

fn default_ordering_group() -> String {
    "fifo".to_string()
}
