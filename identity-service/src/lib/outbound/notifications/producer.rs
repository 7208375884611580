use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use thiserror::Error;

use crate::config::KafkaConfig;
use crate::domain::auth::errors::NotifierError;
use crate::domain::auth::models::ResetNotice;
use crate::domain::auth::ports::ResetNotifier;
use crate::outbound::notifications::messages::NotificationMessage;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for NotifierError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => NotifierError::SerializationFailed(msg),
            KafkaProducerError::SendError(msg) => NotifierError::PublishFailed(msg),
        }
    }
}

/// Publishes password reset notices to a Kafka topic for the mailer.
pub struct KafkaResetNotifier {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaResetNotifier {
    /// Create a new Kafka producer with "at least once" delivery semantics
    ///
    /// # Notes:
    /// - `acks=all`: Wait for all in-sync replicas to acknowledge
    /// - `enable.idempotence=true`: Prevents duplicate messages during retries
    /// - `message.timeout.ms=10000`: A reset request should not hang on a dead broker
    pub fn new(config: &KafkaConfig) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.brokers,
            topic = %config.topic,
            "Initializing Kafka producer for reset notifications"
        );

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("message.timeout.ms", "10000")
            .set("enable.idempotence", "true")
            .set("acks", "all")
            .set("retries", "5")
            .set("retry.backoff.ms", "100")
            .create()?;

        Ok(Self {
            producer,
            topic: config.topic.clone(),
            timeout: Duration::from_secs(10),
        })
    }

    async fn publish(&self, key: &str, payload: &str) -> Result<(), KafkaProducerError> {
        let record = FutureRecord::to(&self.topic).key(key).payload(payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| {
                tracing::debug!(topic = %self.topic, "Reset notification published");
            })
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl ResetNotifier for KafkaResetNotifier {
    async fn send_reset_token(&self, notice: &ResetNotice) -> Result<(), NotifierError> {
        let message = NotificationMessage::from(notice);
        let payload = serde_json::to_string(&message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        // Partition by email so notices for one address stay ordered
        self.publish(notice.email.as_str(), &payload)
            .await
            .map_err(NotifierError::from)
    }
}
