//! Shared vital-reading shapes used across normalized, scored, and alert events.

use serde::{Deserialize, Serialize};

/// A single scalar vital reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalReading {
    pub value: f64,
    pub unit: String,
    pub timestamp: String,
}

impl VitalReading {
    pub fn new(value: f64, unit: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Blood pressure is modeled separately: systolic/diastolic may each be
/// missing independently, per spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BloodPressureReading {
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
    pub unit: Option<BloodPressureUnit>,
    pub timestamp: Option<BloodPressureTimestamp>,
}

/// Placeholder newtypes kept distinct from the scalar reading's `String`
/// fields so blood pressure's "merged, half may be null" shape stays
/// type-honest rather than reusing `VitalReading` (which requires both
/// `value` and `unit`).
pub type BloodPressureUnit = String;
pub type BloodPressureTimestamp = String;

/// Canonical vital names after alias resolution.
pub mod names {
    pub const HEART_RATE: &str = "heart_rate";
    pub const OXYGEN_SATURATION: &str = "oxygen_saturation";
    pub const TEMPERATURE: &str = "temperature";
    pub const SYSTOLIC_PRESSURE: &str = "systolic_pressure";
    pub const DIASTOLIC_PRESSURE: &str = "diastolic_pressure";
    pub const BLOOD_PRESSURE: &str = "blood_pressure";
    pub const RESPIRATORY_RATE: &str = "respiratory_rate";
}
