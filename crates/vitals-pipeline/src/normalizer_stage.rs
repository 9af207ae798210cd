//! Consumer/producer loop for C2: `telemetry.raw` → `telemetry.normalized`.

use std::sync::Arc;

use tracing::{info, warn};
use vitals_bus::{MessageBus, OffsetReset, ShutdownSignal, Topic};
use vitals_schemas::raw::RawEvent;
use vitals_schemas::registry::PatientResolver;

pub struct NormalizerStage {
    bus: Arc<dyn MessageBus>,
    resolver: Arc<dyn PatientResolver>,
    consumer_group: String,
}

impl NormalizerStage {
    pub fn new(bus: Arc<dyn MessageBus>, resolver: Arc<dyn PatientResolver>, consumer_group: impl Into<String>) -> Self {
        Self { bus, resolver, consumer_group: consumer_group.into() }
    }

    /// Run until `shutdown` fires. Each iteration consumes one message,
    /// decodes+normalizes+produces it, then checks for shutdown — this is
    /// the "drain current in-flight message" half of the cooperative
    /// shutdown sequence.
    pub async fn run(&self, shutdown: ShutdownSignal) -> Result<(), vitals_errors::BusError> {
        let mut consumer = self
            .bus
            .consume(Topic::TelemetryRaw, &self.consumer_group, OffsetReset::Earliest)
            .await?;
        let mut stop = shutdown.subscribe();

        loop {
            tokio::select! {
                biased;
                _ = stop.recv() => {
                    info!("normalizer stage received shutdown signal");
                    return Ok(());
                }
                received = consumer.recv() => {
                    match received? {
                        None => return Ok(()),
                        Some(message) => self.handle_message(message).await,
                    }
                }
            }
        }
    }

    async fn handle_message(&self, message: vitals_bus::BusMessage) {
        let raw: RawEvent = match serde_json::from_slice(&message.payload) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "dropping unparseable raw event");
                return;
            }
        };

        let normalized = match vitals_normalizer::normalize(&raw, self.resolver.as_ref()).await {
            Ok(normalized) => normalized,
            Err(error) => {
                warn!(%error, device_id = %raw.device_id, "dropping raw event");
                return;
            }
        };

        let Ok(payload) = serde_json::to_vec(&normalized) else {
            warn!("failed to encode normalized event, dropping");
            return;
        };

        let key = normalized.device_id.clone().into_bytes();
        if let Err(error) = self
            .bus
            .produce(Topic::TelemetryNormalized, vitals_bus::BusMessage::new(key, payload))
            .await
        {
            warn!(%error, "failed to produce normalized event");
        }
    }
}
