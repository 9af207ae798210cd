//! Pure scoring functions — no I/O, no async. `vitals-pipeline` and
//! [`crate::service`] both call these; keeping them free of side effects
//! makes them trivial to property-test.

use vitals_baseline::BaselineStats;
use vitals_schemas::scored::Severity;

/// Static clinical ranges used only for the cold-start fallback table.
/// Not used once a baseline exists.
fn clinical_range(vital: &str) -> Option<(f64, f64)> {
    match vital {
        "heart_rate" => Some((60.0, 100.0)),
        "oxygen_saturation" => Some((95.0, 100.0)),
        "temperature" => Some((36.1, 37.2)),
        _ => None,
    }
}

/// Result of scoring a single vital reading.
#[derive(Debug, Clone, PartialEq)]
pub struct VitalScore {
    pub score: f64,
    pub severity: Severity,
    pub is_anomaly: bool,
    pub factors: Vec<String>,
}

impl VitalScore {
    fn new(score: f64, factors: Vec<String>) -> Self {
        Self {
            score,
            severity: Severity::from_score(score),
            is_anomaly: score > 0.5,
            factors,
        }
    }
}

/// Score `value` for `vital` given its current baseline stats (`None` on
/// cold start). Does not append to the baseline — callers append after
/// scoring so the sample never influences its own score.
pub fn score_vital(vital: &str, value: f64, stats: Option<BaselineStats>, sample_count: usize) -> VitalScore {
    match stats {
        None => score_cold_start(vital, value, sample_count),
        Some(stats) => score_against_baseline(value, stats),
    }
}

fn score_cold_start(vital: &str, value: f64, sample_count: usize) -> VitalScore {
    let (score, membership) = match clinical_range(vital) {
        Some((min, max)) if value < min || value > max => (0.5, "outside the static clinical range"),
        Some(_) => (0.2, "inside the static clinical range"),
        None => (0.3, "has no clinical range defined"),
    };

    let factor = format!(
        "cold start ({sample_count} samples so far): value {membership} for {vital}"
    );
    VitalScore::new(score, vec![factor])
}

fn score_against_baseline(value: f64, stats: BaselineStats) -> VitalScore {
    let z = (value - stats.mean) / stats.stddev;
    let abs_z = z.abs();

    let score = if abs_z <= 1.0 {
        0.2 * abs_z
    } else if abs_z <= 2.0 {
        0.2 + 0.2 * (abs_z - 1.0)
    } else if abs_z <= 3.0 {
        0.4 + 0.2 * (abs_z - 2.0)
    } else if abs_z <= 4.0 {
        0.6 + 0.2 * (abs_z - 3.0)
    } else {
        (0.8 + 0.2 * (abs_z - 4.0)).min(1.0)
    };

    let direction = if value >= stats.mean { "above" } else { "below" };
    let factor = format!(
        "z-score {z:.2} ({direction} mean {mean:.2}, stddev {stddev:.2}, n={count})",
        mean = stats.mean,
        stddev = stats.stddev,
        count = stats.count
    );

    VitalScore::new(score, vec![factor])
}

/// Weight of each core vital in the overall risk score.
pub const HR_WEIGHT: f64 = 0.35;
pub const SPO2_WEIGHT: f64 = 0.35;
pub const TEMP_WEIGHT: f64 = 0.30;

/// Weighted mean of present core-vital scores, with missing vitals
/// dropping out and remaining weights renormalized.
pub fn score_overall(
    heart_rate: Option<f64>,
    oxygen_saturation: Option<f64>,
    temperature: Option<f64>,
) -> f64 {
    let weighted = [
        (heart_rate, HR_WEIGHT),
        (oxygen_saturation, SPO2_WEIGHT),
        (temperature, TEMP_WEIGHT),
    ];

    let total_weight: f64 = weighted
        .iter()
        .filter_map(|(v, w)| v.map(|_| *w))
        .sum();

    if total_weight <= 0.0 {
        return 0.0;
    }

    weighted
        .iter()
        .filter_map(|(v, w)| v.map(|score| score * w))
        .sum::<f64>()
        / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_start_outside_range_scores_half() {
        let result = score_vital("heart_rate", 200.0, None, 2);
        assert_eq!(result.score, 0.5);
        assert!(result.is_anomaly);
    }

    #[test]
    fn cold_start_inside_range_scores_low() {
        let result = score_vital("heart_rate", 72.0, None, 2);
        assert_eq!(result.score, 0.2);
        assert!(!result.is_anomaly);
    }

    #[test]
    fn cold_start_unknown_vital_scores_point_three() {
        let result = score_vital("respiratory_rate", 16.0, None, 2);
        assert_eq!(result.score, 0.3);
    }

    #[test]
    fn z_score_piecewise_segments_are_continuous_at_boundaries() {
        let stats = BaselineStats { mean: 0.0, stddev: 1.0, count: 20 };
        for z in [1.0, 2.0, 3.0, 4.0] {
            let at = score_against_baseline(z, stats).score;
            let just_after = score_against_baseline(z + 1e-9, stats).score;
            assert!((at - just_after).abs() < 1e-6, "discontinuity at z={z}");
        }
    }

    #[test]
    fn z_score_above_four_is_capped_at_one() {
        let stats = BaselineStats { mean: 0.0, stddev: 1.0, count: 20 };
        let result = score_against_baseline(1000.0, stats);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn overall_score_renormalizes_when_a_vital_is_missing() {
        // Only HR and SpO2 present, both scored 0.4 -> overall should stay 0.4,
        // not drop toward 0 because temperature's weight silently zeroed out.
        let overall = score_overall(Some(0.4), Some(0.4), None);
        assert!((overall - 0.4).abs() < 1e-9);
    }

    #[test]
    fn overall_score_is_zero_when_nothing_present() {
        assert_eq!(score_overall(None, None, None), 0.0);
    }
}
