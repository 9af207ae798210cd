//! Consumer/producer loop for scoring + rules: `telemetry.enriched` →
//! `telemetry.scored` (+ `alerts.raised`).
//!
//! The wire shape on `telemetry.enriched` is the same as a normalized
//! event — the external enricher (out of scope here) only adds fields the
//! core stages don't read. Rules always evaluate against the enriched
//! vitals; the scorer is called per core vital and its failure degrades
//! scoring but never suppresses rule-driven alerts.

use std::sync::Arc;
use std::time::Instant;

use tracing::warn;
use vitals_bus::{MessageBus, OffsetReset, ShutdownSignal, Topic};
use vitals_errors::ScoringError;
use vitals_rules::{evaluate, fuse_severity};
use vitals_schemas::envelope::EventType;
use vitals_schemas::normalized::NormalizedEvent;
use vitals_schemas::scored::{
    AnomalyScore, AnomalyScoresByVital, OverallRiskScore, ScoredEvent, ScoringMetadata, Severity,
};
use vitals_scorer::ScorerClient;

use crate::alert_builder::build_alert;

/// Stamped on `scoring_metadata.scoring_engine` when the scorer RPC failed
/// and the degraded path was taken.
pub const FALLBACK_SCORING_ENGINE: &str = "rules-engine-fallback";
pub const SCORING_ENGINE: &str = "vitals-scorer";

pub struct ScoringStage {
    bus: Arc<dyn MessageBus>,
    scorer: Arc<ScorerClient>,
    thresholds: vitals_config::RuleThresholds,
    consumer_group: String,
}

impl ScoringStage {
    pub fn new(
        bus: Arc<dyn MessageBus>,
        scorer: Arc<ScorerClient>,
        thresholds: vitals_config::RuleThresholds,
        consumer_group: impl Into<String>,
    ) -> Self {
        Self { bus, scorer, thresholds, consumer_group: consumer_group.into() }
    }

    pub async fn run(&self, shutdown: ShutdownSignal) -> Result<(), vitals_errors::BusError> {
        let mut consumer = self
            .bus
            .consume(Topic::TelemetryEnriched, &self.consumer_group, OffsetReset::Earliest)
            .await?;
        let mut stop = shutdown.subscribe();

        loop {
            tokio::select! {
                biased;
                _ = stop.recv() => return Ok(()),
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
        let enriched: NormalizedEvent = match serde_json::from_slice(&message.payload) {
            Ok(event) => event,
            Err(error) => {
                warn!(%error, "dropping unparseable enriched event");
                return;
            }
        };

        let rule_results = evaluate(&enriched.vitals, &self.thresholds);
        let fused_severity = fuse_severity(&rule_results);

        let started = Instant::now();
        let (anomaly_scores, overall, scoring_engine) = match self.score(&enriched).await {
            Ok(scores) => (scores.0, scores.1, SCORING_ENGINE),
            Err(error) => {
                warn!(%error, patient_id = %enriched.patient_id, "scorer unavailable, falling back to degraded scored event");
                (
                    AnomalyScoresByVital::default(),
                    OverallRiskScore {
                        score: 0.0,
                        severity: Severity::Normal,
                        is_anomaly: false,
                        aggregation_method: "degraded_fallback".to_string(),
                    },
                    FALLBACK_SCORING_ENGINE,
                )
            }
        };

        let scored = ScoredEvent {
            envelope: enriched.envelope.derive(EventType::TelemetryScored, enriched.envelope.timestamp.clone()),
            device_id: enriched.device_id.clone(),
            patient_id: enriched.patient_id.clone(),
            vitals: enriched.vitals.clone(),
            validation_status: enriched.validation_status,
            normalization_metadata: enriched.normalization_metadata.clone(),
            anomaly_scores,
            overall_risk_score: overall.clone(),
            scoring_metadata: ScoringMetadata {
                scored_at: scored_at_now(),
                scoring_engine: scoring_engine.to_string(),
                scoring_engine_version: vitals_scorer::service::MODEL_VERSION.to_string(),
                processing_time_ms: started.elapsed().as_millis() as u64,
            },
        };

        let alert = build_alert(
            &scored.envelope,
            &scored.patient_id,
            &scored.device_id,
            &scored.vitals,
            &rule_results,
            fused_severity,
            overall.score,
        );

        self.publish(Topic::TelemetryScored, &scored.device_id, &scored).await;
        if let Some(alert) = alert {
            self.publish(Topic::AlertsRaised, &alert.patient_id, &alert).await;
        }
    }

    async fn score(
        &self,
        enriched: &NormalizedEvent,
    ) -> Result<(AnomalyScoresByVital, OverallRiskScore), ScoringError> {
        let mut scores = AnomalyScoresByVital::default();
        let mut for_overall = Vec::new();

        for (name, reading) in enriched.vitals.core_vitals() {
            let response = self
                .scorer
                .score_vital(&enriched.patient_id, name, reading.value)
                .await?;
            let anomaly = AnomalyScore {
                score: response.score,
                severity: severity_from_wire(&response.severity),
                is_anomaly: response.is_anomaly,
                model_version: response.model_version,
                factors: response.factors,
            };
            for_overall.push((name.to_string(), anomaly.score));
            match name {
                "heart_rate" => scores.heart_rate = Some(anomaly),
                "oxygen_saturation" => scores.oxygen_saturation = Some(anomaly),
                "temperature" => scores.temperature = Some(anomaly),
                _ => {}
            }
        }

        let overall = self.scorer.score_overall(&enriched.patient_id, &for_overall).await?;
        Ok((
            scores,
            OverallRiskScore {
                score: overall.score,
                severity: severity_from_wire(&overall.severity),
                is_anomaly: overall.is_anomaly,
                aggregation_method: overall.aggregation_method,
            },
        ))
    }

    async fn publish<T: serde::Serialize>(&self, topic: Topic, key: &str, value: &T) {
        let Ok(payload) = serde_json::to_vec(value) else {
            warn!("failed to encode outgoing event, dropping");
            return;
        };
        if let Err(error) = self
            .bus
            .produce(topic, vitals_bus::BusMessage::new(key.as_bytes().to_vec(), payload))
            .await
        {
            warn!(%error, %topic, "failed to produce event");
        }
    }
}

fn severity_from_wire(wire: &str) -> Severity {
    match wire {
        "low" => Severity::Low,
        "medium" => Severity::Medium,
        "high" => Severity::High,
        "critical" => Severity::Critical,
        _ => Severity::Normal,
    }
}

fn scored_at_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
