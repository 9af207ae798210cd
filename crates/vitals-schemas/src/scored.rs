//! Scored telemetry: per-vital anomaly scores plus an overall risk score.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::envelope::EventEnvelope;
use crate::normalized::{NormalizationMetadata, ValidationStatus, VitalsMap};

/// Severity band derived from a continuous anomaly score. Ordered so that
/// `Normal < Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Map a score in `[0.0, 1.0]` to its severity band.
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Severity::Normal
        } else if score < 0.4 {
            Severity::Low
        } else if score < 0.6 {
            Severity::Medium
        } else if score < 0.8 {
            Severity::High
        } else {
            Severity::Critical
        }
    }
}

/// Rule/alert severity, distinct from the scorer's five-band [`Severity`]:
/// rules only ever produce `OK`, `warning`, or `critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSeverity {
    Ok,
    Warning,
    Critical,
}

impl RuleSeverity {
    fn rank(self) -> u8 {
        match self {
            RuleSeverity::Ok => 0,
            RuleSeverity::Warning => 1,
            RuleSeverity::Critical => 2,
        }
    }
}

impl PartialOrd for RuleSeverity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.rank().cmp(&other.rank()))
    }
}

impl Ord for RuleSeverity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Alert severity — the subset of [`RuleSeverity`] an alert may actually
/// carry (never `OK`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

/// Per-vital anomaly score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScore {
    pub score: f64,
    pub severity: Severity,
    pub is_anomaly: bool,
    pub model_version: String,
    pub factors: Vec<String>,
}

/// Weighted overall risk score across the core vitals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRiskScore {
    pub score: f64,
    pub severity: Severity,
    pub is_anomaly: bool,
    pub aggregation_method: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringMetadata {
    pub scored_at: String,
    pub scoring_engine: String,
    pub scoring_engine_version: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScoresByVital {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<AnomalyScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oxygen_saturation: Option<AnomalyScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<AnomalyScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respiratory_rate: Option<AnomalyScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,
    pub device_id: String,
    pub patient_id: String,
    pub vitals: VitalsMap,
    pub validation_status: ValidationStatus,
    pub normalization_metadata: NormalizationMetadata,
    pub anomaly_scores: AnomalyScoresByVital,
    pub overall_risk_score: OverallRiskScore,
    pub scoring_metadata: ScoringMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_bands_are_half_open_at_their_lower_edge() {
        assert_eq!(Severity::from_score(0.0), Severity::Normal);
        assert_eq!(Severity::from_score(0.1999), Severity::Normal);
        assert_eq!(Severity::from_score(0.2), Severity::Low);
        assert_eq!(Severity::from_score(0.4), Severity::Medium);
        assert_eq!(Severity::from_score(0.6), Severity::High);
        assert_eq!(Severity::from_score(0.8), Severity::Critical);
        assert_eq!(Severity::from_score(1.0), Severity::Critical);
    }

    #[test]
    fn severity_ordering_is_monotonic_in_declared_order() {
        assert!(Severity::Normal < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn rule_severity_fusion_order() {
        assert!(RuleSeverity::Ok < RuleSeverity::Warning);
        assert!(RuleSeverity::Warning < RuleSeverity::Critical);
    }
}
