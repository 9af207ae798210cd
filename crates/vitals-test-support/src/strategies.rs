//! Reusable `proptest` strategies for vitals domain values, so property
//! tests across crates (`vitals-normalizer`, `vitals-scorer`,
//! `vitals-aggregator`) generate values from the same distributions
//! instead of redefining ranges ad hoc.

use proptest::prelude::*;

/// A heart rate spanning well outside the physiological clamp range
/// (20-240 bpm), to exercise clamping at both ends.
pub fn arb_heart_rate_raw() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0
}

/// An oxygen saturation percentage including out-of-range values.
pub fn arb_spo2_raw() -> impl Strategy<Value = f64> {
    -50.0f64..150.0
}

/// A body temperature in Celsius, including out-of-range values.
pub fn arb_temperature_c_raw() -> impl Strategy<Value = f64> {
    -50.0f64..80.0
}

/// A unix-seconds timestamp within a plausible multi-year span, used by
/// rolling-window eviction property tests.
pub fn arb_unix_seconds() -> impl Strategy<Value = i64> {
    1_700_000_000i64..1_900_000_000i64
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn heart_rate_strategy_stays_within_declared_bounds(hr in arb_heart_rate_raw()) {
            prop_assert!((-1000.0..1000.0).contains(&hr));
        }
    }
}
