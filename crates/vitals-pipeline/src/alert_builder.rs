//! Builds an [`AlertEvent`] from triggered rules. Alerts are driven by
//! rule severity alone — the scorer's anomaly score never raises or
//! suppresses one on its own.

use vitals_rules::RuleResult;
use vitals_schemas::alert::{AlertCondition, AlertDetails, AlertEvent, AlertMetadata, AlertType};
use vitals_schemas::envelope::{EventEnvelope, EventType};
use vitals_schemas::normalized::VitalsMap;
use vitals_schemas::scored::{AlertSeverity, RuleSeverity};

pub const RULE_VERSION: &str = "1.0.0";

/// `None` when the fused severity is `OK` — no alert is ever built for
/// that case.
pub fn build_alert(
    parent: &EventEnvelope,
    patient_id: &str,
    device_id: &str,
    vitals: &VitalsMap,
    triggered: &[RuleResult],
    fused: RuleSeverity,
    overall_score: f64,
) -> Option<AlertEvent> {
    let severity = match fused {
        RuleSeverity::Ok => return None,
        RuleSeverity::Warning => AlertSeverity::Warning,
        RuleSeverity::Critical => AlertSeverity::Critical,
    };

    let alert_type = match triggered {
        [] => return None,
        [only] if only.rule_id == "hr_high_spo2_low_combined" => AlertType::CriticalCondition,
        [_] => AlertType::VitalSignAnomaly,
        _ => AlertType::MultiVitalAnomaly,
    };

    let vital_sign = if triggered.len() == 1 {
        rule_vital_name(triggered[0].rule_id).to_string()
    } else {
        "multiple".to_string()
    };

    let description = triggered
        .iter()
        .map(|r| r.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");

    let mut metrics = std::collections::HashMap::new();
    for (name, reading) in vitals.core_vitals() {
        metrics.insert(name.to_string(), reading.clone());
    }

    let timestamp = parent.timestamp.clone();
    Some(AlertEvent {
        envelope: parent.derive(EventType::AlertsRaised, timestamp),
        patient_id: patient_id.to_string(),
        device_id: device_id.to_string(),
        alert_type,
        severity,
        condition: AlertCondition {
            description,
            vital_sign,
            anomaly_score: overall_score,
        },
        details: AlertDetails {
            metrics,
            rules_triggered: triggered.iter().map(|r| r.rule_id.to_string()).collect(),
            anomaly_score: overall_score,
        },
        alert_metadata: AlertMetadata {
            raised_by: "rules-engine".to_string(),
            rule_version: RULE_VERSION.to_string(),
            acknowledged: false,
            resolved: false,
        },
    })
}

fn rule_vital_name(rule_id: &str) -> &'static str {
    match rule_id {
        "hr_max_exceeded" => "heart_rate",
        "spo2_min_below" => "oxygen_saturation",
        "temp_max_exceeded" => "temperature",
        "hr_high_spo2_low_combined" => "heart_rate,oxygen_saturation",
        _ => "unknown",
    }
}
