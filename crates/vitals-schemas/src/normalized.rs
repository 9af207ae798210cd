//! Normalized telemetry: unit/range discipline applied, canonical vital names.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::envelope::EventEnvelope;
use crate::vitals::{BloodPressureReading, VitalReading};

/// Outcome of normalization for a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Valid,
    Warning,
}

/// Per-vital readings on a normalized event. Blood pressure is merged into
/// a single entry separate from the scalar vitals, since either half may be
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsMap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<VitalReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<VitalReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<VitalReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<VitalReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressureReading>,
    /// Vitals whose metric name didn't match any known alias; kept
    /// lower-cased, passed through rather than dropped.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub other: HashMap<String, VitalReading>,
}

impl VitalsMap {
    /// Iterate the three core vitals used by overall-risk weighting, in
    /// `(name, reading)` pairs, skipping any that are absent.
    pub fn core_vitals(&self) -> impl Iterator<Item = (&'static str, &VitalReading)> {
        [
            ("heart_rate", self.heart_rate.as_ref()),
            ("oxygen_saturation", self.oxygen_saturation.as_ref()),
            ("temperature", self.temperature.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, reading)| reading.map(|r| (name, r)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizationMetadata {
    pub normalized_at: String,
    pub rules_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,
    pub device_id: String,
    pub patient_id: String,
    pub vitals: VitalsMap,
    pub validation_status: ValidationStatus,
    pub normalization_metadata: NormalizationMetadata,
}
