//! In-process reference backend for tests and single-process demos.
//!
//! Built on [`tokio::sync::broadcast`]: each topic owns one broadcast
//! channel, and every `consume` call hands back a fresh receiver subscribed
//! from "now". There is no replay log, so [`OffsetReset::Earliest`] is a
//! no-op here — a consumer that subscribes after a message was produced
//! never sees it. That's fine for the pipeline's own tests, which always
//! start consumers before producing; it would not be fine for `KafkaBus`,
//! which does honor the offset.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::broadcast;
use vitals_errors::BusError;

use crate::{BusConsumer, BusMessage, MessageBus, OffsetReset, Topic};

const CHANNEL_CAPACITY: usize = 1024;

pub struct InMemoryBus {
    channels: HashMap<Topic, broadcast::Sender<BusMessage>>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(CHANNEL_CAPACITY).0))
            .collect();
        Self { channels }
    }

    #[allow(clippy::expect_used)]
    fn sender(&self, topic: Topic) -> &broadcast::Sender<BusMessage> {
        // `channels` is seeded from `Topic::ALL` in `new` and never shrinks,
        // so every `Topic` value has an entry.
        self.channels
            .get(&topic)
            .expect("all Topic::ALL variants are registered at construction")
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn produce(&self, topic: Topic, message: BusMessage) -> Result<(), BusError> {
        // No subscribers is not an error: a demo may produce to a topic
        // nobody is consuming yet.
        let _ = self.sender(topic).send(message);
        Ok(())
    }

    async fn consume(
        &self,
        topic: Topic,
        _group: &str,
        _offset_reset: OffsetReset,
    ) -> Result<Box<dyn BusConsumer>, BusError> {
        Ok(Box::new(InMemoryConsumer {
            receiver: self.sender(topic).subscribe(),
        }))
    }
}

struct InMemoryConsumer {
    receiver: broadcast::Receiver<BusMessage>,
}

#[async_trait]
impl BusConsumer for InMemoryConsumer {
    async fn recv(&mut self) -> Result<Option<BusMessage>, BusError> {
        loop {
            match self.receiver.recv().await {
                Ok(message) => return Ok(Some(message)),
                Err(broadcast::error::RecvError::Closed) => return Ok(None),
                // A slow consumer missed messages; skip ahead rather than
                // fail the stage loop over it.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "in-memory bus consumer lagged, skipping ahead");
                    continue;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn produce_then_consume_round_trips() {
        let bus = InMemoryBus::new();
        let mut consumer = bus
            .consume(Topic::TelemetryRaw, "ingest", OffsetReset::Earliest)
            .await
            .unwrap();

        bus.produce(Topic::TelemetryRaw, BusMessage::new(b"device-1".to_vec(), b"{}".to_vec()))
            .await
            .unwrap();

        let received = consumer.recv().await.unwrap().unwrap();
        assert_eq!(received.key, b"device-1");
        assert_eq!(received.payload, b"{}");
    }

    #[tokio::test]
    async fn independent_groups_each_see_every_message() {
        let bus = InMemoryBus::new();
        let mut group_a = bus
            .consume(Topic::AlertsRaised, "a", OffsetReset::Latest)
            .await
            .unwrap();
        let mut group_b = bus
            .consume(Topic::AlertsRaised, "b", OffsetReset::Latest)
            .await
            .unwrap();

        bus.produce(Topic::AlertsRaised, BusMessage::new(b"p1".to_vec(), b"x".to_vec()))
            .await
            .unwrap();

        assert!(group_a.recv().await.unwrap().is_some());
        assert!(group_b.recv().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn dropping_all_senders_closes_consumers() {
        let bus = InMemoryBus::new();
        let mut consumer = bus
            .consume(Topic::TelemetryScored, "scorer", OffsetReset::Latest)
            .await
            .unwrap();
        drop(bus);

        assert_eq!(consumer.recv().await.unwrap(), None);
    }
}
