//! Device-originated raw telemetry, as received before normalization.

use serde::{Deserialize, Serialize};

use crate::envelope::EventEnvelope;

/// A single raw measurement as reported by a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub metric: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Optional metadata accompanying a raw event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub patient_id: Option<String>,
}

/// A raw telemetry event as it arrives on `telemetry.raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,
    pub device_id: String,
    /// Timestamp as received — permissively typed; parsed by the normalizer
    /// per the precedence rules in `vitals-normalizer`.
    pub timestamp: serde_json::Value,
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub metadata: RawMetadata,
    #[serde(default)]
    pub patient_id: Option<String>,
}
