//! Builders for domain events: named-variant constructors plus `with_*`
//! builder methods, and a `get_*_fixtures()` all-variants helper per type.

use serde_json::{json, Value};

/// Builds a `telemetry.raw` JSON payload for end-to-end tests, matching
/// `RawEvent`'s wire shape without requiring callers to depend on
/// `vitals-schemas` directly for this common case.
#[derive(Debug, Clone)]
pub struct RawEventFixture {
    pub event_id: String,
    pub device_id: String,
    pub patient_id: String,
    pub timestamp: String,
    pub measurements: Vec<(String, f64, Option<String>)>,
}

impl Default for RawEventFixture {
    fn default() -> Self {
        Self::healthy_adult()
    }
}

impl RawEventFixture {
    pub fn new(device_id: impl Into<String>, patient_id: impl Into<String>) -> Self {
        Self {
            event_id: "evt_fixture".to_string(),
            device_id: device_id.into(),
            patient_id: patient_id.into(),
            timestamp: "2026-07-27T12:00:00Z".to_string(),
            measurements: Vec::new(),
        }
    }

    /// A resting adult with all four core vitals in normal range.
    pub fn healthy_adult() -> Self {
        Self::new("dev-fixture-1", "pat-fixture-1")
            .with_measurement("hr", 72.0, Some("bpm"))
            .with_measurement("spo2", 98.0, Some("%"))
            .with_measurement("temp", 37.0, Some("c"))
            .with_measurement("resp", 16.0, Some("breaths/min"))
    }

    /// Triggers the fever rule alone.
    pub fn fever() -> Self {
        Self::new("dev-fixture-2", "pat-fixture-2")
            .with_measurement("hr", 80.0, Some("bpm"))
            .with_measurement("spo2", 97.0, Some("%"))
            .with_measurement("temp", 102.0, Some("f"))
    }

    /// Triggers the combined tachycardia + hypoxia critical-condition rule.
    pub fn tachycardia_with_hypoxia() -> Self {
        Self::new("dev-fixture-3", "pat-fixture-3")
            .with_measurement("hr", 130.0, Some("bpm"))
            .with_measurement("spo2", 88.0, Some("%"))
    }

    pub fn with_measurement(mut self, metric: impl Into<String>, value: f64, unit: Option<&str>) -> Self {
        self.measurements.push((metric.into(), value, unit.map(str::to_string)));
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = event_id.into();
        self
    }

    pub fn build(&self) -> Value {
        json!({
            "event_id": self.event_id,
            "trace_id": format!("trace_{}", self.event_id),
            "source_event_id": null,
            "event_type": "telemetry.raw",
            "version": "1.0.0",
            "timestamp": self.timestamp,
            "device_id": self.device_id,
            "patient_id": self.patient_id,
            "metadata": {"patient_id": self.patient_id},
            "measurements": self.measurements.iter().map(|(metric, value, unit)| {
                json!({"metric": metric, "value": value, "unit": unit})
            }).collect::<Vec<_>>(),
        })
    }
}

/// Builds a `telemetry.scored` JSON payload, used by aggregator and query
/// tests that need a scored event without running the scoring stage.
#[derive(Debug, Clone)]
pub struct ScoredEventFixture {
    pub event_id: String,
    pub patient_id: String,
    pub device_id: String,
    pub timestamp: String,
    pub heart_rate: Option<f64>,
    pub overall_severity: String,
    pub overall_score: f64,
}

impl Default for ScoredEventFixture {
    fn default() -> Self {
        Self {
            event_id: "evt_scored_fixture".to_string(),
            patient_id: "pat-fixture-1".to_string(),
            device_id: "dev-fixture-1".to_string(),
            timestamp: "2026-07-27T12:00:00Z".to_string(),
            heart_rate: Some(72.0),
            overall_severity: "normal".to_string(),
            overall_score: 0.1,
        }
    }
}

impl ScoredEventFixture {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self { patient_id: patient_id.into(), ..Default::default() }
    }

    pub fn with_heart_rate(mut self, value: f64) -> Self {
        self.heart_rate = Some(value);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = event_id.into();
        self
    }

    pub fn build(&self) -> Value {
        let mut vitals = json!({});
        if let Some(hr) = self.heart_rate {
            vitals["heart_rate"] = json!({"value": hr, "unit": "bpm", "timestamp": self.timestamp});
        }

        json!({
            "event_id": self.event_id,
            "trace_id": format!("trace_{}", self.event_id),
            "source_event_id": null,
            "event_type": "telemetry.scored",
            "version": "1.0.0",
            "timestamp": self.timestamp,
            "device_id": self.device_id,
            "patient_id": self.patient_id,
            "vitals": vitals,
            "validation_status": "valid",
            "normalization_metadata": {"normalized_at": self.timestamp, "rules_version": "1.0.0", "warnings": []},
            "anomaly_scores": {},
            "overall_risk_score": {
                "score": self.overall_score,
                "severity": self.overall_severity,
                "is_anomaly": self.overall_score >= 0.4,
                "aggregation_method": "weighted_mean_core_vitals",
            },
            "scoring_metadata": {
                "scored_at": self.timestamp,
                "scoring_engine": "vitals-scorer",
                "scoring_engine_version": "vitals-scorer-1.0.0",
                "processing_time_ms": 1,
            },
        })
    }
}

pub fn get_raw_event_fixtures() -> Vec<RawEventFixture> {
    vec![RawEventFixture::healthy_adult(), RawEventFixture::fever(), RawEventFixture::tachycardia_with_hypoxia()]
}
