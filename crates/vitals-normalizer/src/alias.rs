//! Case-insensitive metric name canonicalization.

use vitals_schemas::vitals::names;

/// Map a raw metric name to its canonical form. Unknown names pass through
/// lower-cased rather than being dropped.
pub fn canonicalize(metric: &str) -> String {
    match metric.to_lowercase().as_str() {
        "hr" | "heartrate" | "heart_rate" | "pulse" => names::HEART_RATE.to_string(),
        "spo2" | "o2sat" | "o2" | "oxygen_saturation" => names::OXYGEN_SATURATION.to_string(),
        "temp" | "temperature" | "body_temp" => names::TEMPERATURE.to_string(),
        "systolic" => names::SYSTOLIC_PRESSURE.to_string(),
        "diastolic" => names::DIASTOLIC_PRESSURE.to_string(),
        "bp" | "blood_pressure" => names::BLOOD_PRESSURE.to_string(),
        "rr" | "respiration" | "respiratory_rate" => names::RESPIRATORY_RATE.to_string(),
        other => other.to_string(),
    }
}
