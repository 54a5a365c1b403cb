use crate::backend::{QueueBackend, SendCallback};
use crate::config::ProducerConfig;
use crate::message::{Envelope, Receipt};
use crate::{Error, Result};
use async_trait::async_trait;
use rdkafka::config::RDKafkaLogLevel;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use rdkafka::ClientConfig;
use std::time::Duration;
use tracing::{debug, info};

const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Kafka implementation of [`QueueBackend`] over rdkafka's `FutureProducer`.
pub struct KafkaBackend {
    producer: FutureProducer,
    topics: Vec<String>,
}

impl KafkaBackend {
    pub fn new(config: &ProducerConfig) -> Result<Self> {
        let mut client_config = ClientConfig::new();
        client_config
            .set("bootstrap.servers", &config.endpoint)
            .set("client.id", &config.group);

        if !config.access_key.is_empty() {
            client_config
                .set("security.protocol", "SASL_PLAINTEXT")
                .set("sasl.mechanism", "PLAIN")
                .set("sasl.username", &config.access_key)
                .set("sasl.password", &config.secret_key);
        }

        // Diagnostics are scoped to this client, not the process.
        if config.debug_logging {
            client_config
                .set("debug", "broker,topic,msg")
                .set_log_level(RDKafkaLogLevel::Debug);
        }

        let producer: FutureProducer = client_config.create().map_err(Error::Kafka)?;

        Ok(Self {
            producer,
            topics: config.topics.clone(),
        })
    }
}

#[async_trait]
impl QueueBackend for KafkaBackend {
    async fn start(&self) -> Result<()> {
        if self.topics.is_empty() {
            return Err(Error::Config(
                "at least one topic must be registered before start".to_string(),
            ));
        }

        for topic in &self.topics {
            self.producer
                .client()
                .fetch_metadata(Some(topic), METADATA_TIMEOUT)
                .map_err(Error::Kafka)?;
        }

        info!(topics = ?self.topics, "Kafka producer started");
        Ok(())
    }

    async fn send(&self, envelope: &Envelope) -> Result<Vec<Receipt>> {
        dispatch(self.producer.clone(), envelope.clone()).await
    }

    fn send_async(&self, envelope: Envelope, on_complete: SendCallback) {
        let producer = self.producer.clone();
        tokio::spawn(async move {
            let result = dispatch(producer, envelope).await;
            on_complete(result);
        });
    }

    async fn graceful_stop(&self) -> Result<()> {
        self.producer.flush(Timeout::Never).map_err(Error::Kafka)?;
        info!("Kafka producer stopped");
        Ok(())
    }
}

async fn dispatch(producer: FutureProducer, envelope: Envelope) -> Result<Vec<Receipt>> {
    let mut record: FutureRecord<'_, str, [u8]> =
        FutureRecord::to(&envelope.topic).payload(envelope.body.as_ref());

    if let Some(key) = &envelope.ordering_key {
        record = record.key(key.as_str());
    }

    if let Some(tag) = &envelope.tag {
        record = record.headers(OwnedHeaders::new().insert(Header {
            key: "tag",
            value: Some(tag.as_str()),
        }));
    }

    if let Some(at) = envelope.deliver_at {
        record = record.timestamp(at.timestamp_millis());
    }

    let (partition, offset) = producer
        .send(record, Timeout::Never)
        .await
        .map_err(|(e, _)| Error::Kafka(e))?;

    debug!(
        topic = %envelope.topic,
        partition,
        offset,
        "envelope dispatched"
    );

    Ok(vec![Receipt::new(format!(
        "{}-{}@{}",
        envelope.topic, partition, offset
    ))])
}
