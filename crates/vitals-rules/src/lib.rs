//! Threshold rules over normalized vitals, plus severity fusion.

mod temperature;

pub use temperature::to_fahrenheit;

use vitals_config::RuleThresholds;
use vitals_schemas::normalized::VitalsMap;
use vitals_schemas::scored::RuleSeverity;

/// One rule's evaluation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleResult {
    pub rule_id: &'static str,
    pub severity: RuleSeverity,
    pub message: String,
}

/// Evaluate all four rules against `vitals`, returning only the ones that
/// triggered.
pub fn evaluate(vitals: &VitalsMap, thresholds: &RuleThresholds) -> Vec<RuleResult> {
    let mut results = Vec::new();

    let hr = vitals.heart_rate.as_ref().map(|r| r.value);
    let spo2 = vitals.oxygen_saturation.as_ref().map(|r| r.value);

    if let Some(hr) = hr {
        if hr > thresholds.hr_max {
            results.push(RuleResult {
                rule_id: "hr_max_exceeded",
                severity: RuleSeverity::Warning,
                message: format!("heart rate {hr} exceeds max {}", thresholds.hr_max),
            });
        }
    }

    if let Some(spo2) = spo2 {
        if spo2 < thresholds.spo2_min {
            results.push(RuleResult {
                rule_id: "spo2_min_below",
                severity: RuleSeverity::Critical,
                message: format!("SpO2 {spo2} below min {}", thresholds.spo2_min),
            });
        }
    }

    if let Some(temp) = &vitals.temperature {
        let fahrenheit = to_fahrenheit(temp.value, &temp.unit);
        if fahrenheit > thresholds.temp_max_f {
            results.push(RuleResult {
                rule_id: "temp_max_exceeded",
                severity: RuleSeverity::Warning,
                message: format!("temperature {fahrenheit:.1}F exceeds max {}F", thresholds.temp_max_f),
            });
        }
    }

    if let (Some(hr), Some(spo2)) = (hr, spo2) {
        if hr > thresholds.hr_very_high && spo2 < thresholds.spo2_low {
            results.push(RuleResult {
                rule_id: "hr_high_spo2_low_combined",
                severity: RuleSeverity::Critical,
                message: format!(
                    "heart rate {hr} above {} while SpO2 {spo2} below {}",
                    thresholds.hr_very_high, thresholds.spo2_low
                ),
            });
        }
    }

    results
}

/// `critical > warning > OK`; `OK` when no rule triggered.
pub fn fuse_severity(results: &[RuleResult]) -> RuleSeverity {
    results
        .iter()
        .map(|r| r.severity)
        .max()
        .unwrap_or(RuleSeverity::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_schemas::vitals::VitalReading;

    fn vitals_with(hr: Option<f64>, spo2: Option<f64>, temp_c: Option<f64>) -> VitalsMap {
        VitalsMap {
            heart_rate: hr.map(|v| VitalReading::new(v, "bpm", "t")),
            oxygen_saturation: spo2.map(|v| VitalReading::new(v, "percent", "t")),
            temperature: temp_c.map(|v| VitalReading::new(v, "celsius", "t")),
            ..Default::default()
        }
    }

    #[test]
    fn hr_max_exceeded_fires_as_warning() {
        let results = evaluate(&vitals_with(Some(150.0), None, None), &RuleThresholds::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rule_id, "hr_max_exceeded");
        assert_eq!(results[0].severity, RuleSeverity::Warning);
    }

    #[test]
    fn spo2_min_below_fires_as_critical() {
        let results = evaluate(&vitals_with(None, Some(80.0), None), &RuleThresholds::default());
        assert_eq!(results[0].rule_id, "spo2_min_below");
        assert_eq!(results[0].severity, RuleSeverity::Critical);
    }

    #[test]
    fn temp_max_exceeded_converts_celsius_before_comparing() {
        // 39C = 102.2F, over the 100.4F default threshold.
        let results = evaluate(&vitals_with(None, None, Some(39.0)), &RuleThresholds::default());
        assert_eq!(results[0].rule_id, "temp_max_exceeded");
    }

    #[test]
    fn combined_rule_requires_both_conditions_at_once() {
        let thresholds = RuleThresholds::default();
        let only_hr = evaluate(&vitals_with(Some(130.0), Some(94.0), None), &thresholds);
        assert!(!only_hr.iter().any(|r| r.rule_id == "hr_high_spo2_low_combined"));

        let both = evaluate(&vitals_with(Some(130.0), Some(85.0), None), &thresholds);
        assert!(both.iter().any(|r| r.rule_id == "hr_high_spo2_low_combined"));
    }

    #[test]
    fn no_rules_triggered_fuses_to_ok() {
        let results = evaluate(&vitals_with(Some(72.0), Some(98.0), Some(37.0)), &RuleThresholds::default());
        assert!(results.is_empty());
        assert_eq!(fuse_severity(&results), RuleSeverity::Ok);
    }

    #[test]
    fn critical_dominates_warning_in_fusion() {
        let results = evaluate(&vitals_with(Some(150.0), Some(80.0), None), &RuleThresholds::default());
        assert_eq!(fuse_severity(&results), RuleSeverity::Critical);
    }

    #[test]
    fn hr_max_exceeded_is_strict_at_its_boundary() {
        let thresholds = RuleThresholds::default();

        let at_max = evaluate(&vitals_with(Some(thresholds.hr_max), None, None), &thresholds);
        assert!(!at_max.iter().any(|r| r.rule_id == "hr_max_exceeded"));

        let just_over = evaluate(&vitals_with(Some(thresholds.hr_max + f64::EPSILON), None, None), &thresholds);
        assert!(just_over.iter().any(|r| r.rule_id == "hr_max_exceeded"));
    }

    #[test]
    fn spo2_min_below_is_strict_at_its_boundary() {
        let thresholds = RuleThresholds::default();

        let at_min = evaluate(&vitals_with(None, Some(thresholds.spo2_min), None), &thresholds);
        assert!(!at_min.iter().any(|r| r.rule_id == "spo2_min_below"));

        let just_under = evaluate(&vitals_with(None, Some(thresholds.spo2_min - f64::EPSILON), None), &thresholds);
        assert!(just_under.iter().any(|r| r.rule_id == "spo2_min_below"));
    }
}
