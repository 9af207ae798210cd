//! Kafka-backed [`MessageBus`], feature-gated behind `kafka` — the
//! production backend alongside the in-memory reference implementation.

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message as _;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use vitals_errors::BusError;

use crate::{BusConsumer, BusMessage, MessageBus, OffsetReset, Topic};

const PRODUCE_TIMEOUT: Timeout = Timeout::After(std::time::Duration::from_secs(5));

pub struct KafkaBus {
    producer: FutureProducer,
    brokers: String,
}

impl KafkaBus {
    pub fn connect(brokers: &str) -> Result<Self, BusError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|source| BusError::ConnectFailed(source.to_string()))?;

        Ok(Self {
            producer,
            brokers: brokers.to_string(),
        })
    }
}

#[async_trait]
impl MessageBus for KafkaBus {
    async fn produce(&self, topic: Topic, message: BusMessage) -> Result<(), BusError> {
        let record = FutureRecord::to(topic.as_str())
            .key(&message.key)
            .payload(&message.payload);

        self.producer
            .send(record, PRODUCE_TIMEOUT)
            .await
            .map_err(|(source, _owned_message)| {
                BusError::ProduceFailed(format!("{topic}: {source}"))
            })?;

        Ok(())
    }

    async fn consume(
        &self,
        topic: Topic,
        group: &str,
        offset_reset: OffsetReset,
    ) -> Result<Box<dyn BusConsumer>, BusError> {
        let reset = match offset_reset {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
        };

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .set("group.id", group)
            .set("auto.offset.reset", reset)
            .set("enable.auto.commit", "true")
            .create()
            .map_err(|source| BusError::ConnectFailed(source.to_string()))?;

        consumer
            .subscribe(&[topic.as_str()])
            .map_err(|source| BusError::ConnectFailed(source.to_string()))?;

        Ok(Box::new(KafkaConsumer { consumer }))
    }
}

struct KafkaConsumer {
    consumer: StreamConsumer,
}

#[async_trait]
impl BusConsumer for KafkaConsumer {
    async fn recv(&mut self) -> Result<Option<BusMessage>, BusError> {
        let borrowed = self
            .consumer
            .recv()
            .await
            .map_err(|source| BusError::ConsumeFailed(source.to_string()))?;

        let key = borrowed.key().unwrap_or_default().to_vec();
        let payload = borrowed.payload().unwrap_or_default().to_vec();
        Ok(Some(BusMessage::new(key, payload)))
    }
}
