//! Message bus abstraction for the vitals pipeline.
//!
//! Every stage talks to [`MessageBus`], never to a concrete broker. Tests
//! and single-process demos wire up [`memory::InMemoryBus`]; `vitalsd`
//! wires up [`kafka::KafkaBus`] (behind the `kafka` feature) against the
//! brokers named by `KAFKA_BROKERS` (see `vitals-config`).

mod message;
mod topic;

pub mod memory;
pub mod shutdown;
#[cfg(feature = "kafka")]
pub mod kafka;

pub use message::BusMessage;
pub use shutdown::ShutdownSignal;
pub use topic::{OffsetReset, Topic};

use async_trait::async_trait;
use vitals_errors::BusError;

/// A consumer handle bound to one topic and consumer group.
///
/// `recv` blocks until a message is available or the bus is closed; it
/// returns `Ok(None)` on graceful close so stage loops can exit their
/// `while let Some(msg) = consumer.recv().await?` loop cleanly.
#[async_trait]
pub trait BusConsumer: Send {
    async fn recv(&mut self) -> Result<Option<BusMessage>, BusError>;
}

/// Produce/consume access to the bus, independent of the concrete broker.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn produce(&self, topic: Topic, message: BusMessage) -> Result<(), BusError>;

    /// Subscribe `group` to `topic`, starting from `offset_reset` if the
    /// group has no committed position yet.
    async fn consume(
        &self,
        topic: Topic,
        group: &str,
        offset_reset: OffsetReset,
    ) -> Result<Box<dyn BusConsumer>, BusError>;
}
