//! Consumes `telemetry.scored` and `alerts.raised` independently and
//! folds them into the aggregate store. Unlike the normalizer/scoring
//! stages, this is a read-mostly materialized view, not a ledger, so new
//! consumer groups start from `OffsetReset::Latest`.

use std::sync::Arc;

use chrono::DateTime;
use tracing::warn;
use vitals_bus::{MessageBus, OffsetReset, ShutdownSignal, Topic};
use vitals_schemas::alert::AlertEvent;
use vitals_schemas::scored::{ScoredEvent, Severity};

use crate::AggregateStore;

pub struct AggregatorStage {
    bus: Arc<dyn MessageBus>,
    store: Arc<dyn AggregateStore>,
    consumer_group: String,
}

impl AggregatorStage {
    pub fn new(bus: Arc<dyn MessageBus>, store: Arc<dyn AggregateStore>, consumer_group: impl Into<String>) -> Self {
        Self { bus, store, consumer_group: consumer_group.into() }
    }

    /// Runs both the scored-event and alert-event consume loops
    /// concurrently until `shutdown` fires.
    pub async fn run(&self, shutdown: ShutdownSignal) -> Result<(), vitals_errors::BusError> {
        let scored = self.run_scored(shutdown.clone());
        let alerts = self.run_alerts(shutdown);
        let (scored, alerts) = tokio::join!(scored, alerts);
        scored?;
        alerts?;
        Ok(())
    }

    async fn run_scored(&self, shutdown: ShutdownSignal) -> Result<(), vitals_errors::BusError> {
        let mut consumer = self
            .bus
            .consume(Topic::TelemetryScored, &self.consumer_group, OffsetReset::Latest)
            .await?;
        let mut stop = shutdown.subscribe();

        loop {
            tokio::select! {
                biased;
                _ = stop.recv() => return Ok(()),
                received = consumer.recv() => {
                    match received? {
                        None => return Ok(()),
                        Some(message) => self.handle_scored(message).await,
                    }
                }
            }
        }
    }

    async fn run_alerts(&self, shutdown: ShutdownSignal) -> Result<(), vitals_errors::BusError> {
        let mut consumer = self
            .bus
            .consume(Topic::AlertsRaised, &self.consumer_group, OffsetReset::Latest)
            .await?;
        let mut stop = shutdown.subscribe();

        loop {
            tokio::select! {
                biased;
                _ = stop.recv() => return Ok(()),
                received = consumer.recv() => {
                    match received? {
                        None => return Ok(()),
                        Some(message) => self.handle_alert(message).await,
                    }
                }
            }
        }
    }

    async fn handle_scored(&self, message: vitals_bus::BusMessage) {
        let scored: ScoredEvent = match serde_json::from_slice(&message.payload) {
            Ok(event) => event,
            Err(error) => {
                warn!(%error, "dropping unparseable scored event");
                return;
            }
        };

        let Some(event_timestamp) = parse_unix_seconds(&scored.envelope.timestamp) else {
            warn!(timestamp = %scored.envelope.timestamp, "dropping scored event with unparseable timestamp");
            return;
        };

        if let Err(error) = self
            .store
            .record_scored(&scored.patient_id, &scored.vitals, event_timestamp, &scored.envelope.timestamp)
            .await
        {
            warn!(%error, patient_id = %scored.patient_id, "failed to record scored event");
        }
    }

    async fn handle_alert(&self, message: vitals_bus::BusMessage) {
        let alert: AlertEvent = match serde_json::from_slice(&message.payload) {
            Ok(event) => event,
            Err(error) => {
                warn!(%error, "dropping unparseable alert event");
                return;
            }
        };

        let Some(event_timestamp) = parse_unix_seconds(&alert.envelope.timestamp) else {
            warn!(timestamp = %alert.envelope.timestamp, "dropping alert event with unparseable timestamp");
            return;
        };

        let severity = Severity::from_score(alert.condition.anomaly_score);
        if let Err(error) = self.store.record_alert(severity, event_timestamp).await {
            warn!(%error, patient_id = %alert.patient_id, "failed to record alert counter");
        }
    }
}

fn parse_unix_seconds(rfc3339: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(rfc3339).ok().map(|dt| dt.timestamp())
}
