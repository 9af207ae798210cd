//! Range clamping. Clamping to a different value than the
//! input always produces a warning — that warning is what flips an event's
//! `validation_status` to `warning`.

pub struct ClampRange {
    pub min: f64,
    pub max: f64,
    pub default_unit: &'static str,
}

pub const HEART_RATE: ClampRange = ClampRange { min: 20.0, max: 240.0, default_unit: "bpm" };
pub const OXYGEN_SATURATION: ClampRange = ClampRange { min: 50.0, max: 100.0, default_unit: "percent" };
pub const TEMPERATURE: ClampRange = ClampRange { min: 30.0, max: 45.0, default_unit: "celsius" };

/// Clamp `value` into `range`, returning the clamped value plus an optional
/// warning message when clamping actually changed it.
pub fn clamp(range: &ClampRange, value: f64, vital_name: &str) -> (f64, Option<String>) {
    let clamped = value.clamp(range.min, range.max);
    if value < range.min || value > range.max {
        let warning = format!("{vital_name} clamped from {value} to {clamped} ({unit})", unit = range.default_unit);
        (clamped, Some(warning))
    } else {
        (clamped, None)
    }
}
