//! Clinical alert events raised by the rules engine.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::envelope::EventEnvelope;
use crate::scored::AlertSeverity;
use crate::vitals::VitalReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    VitalSignAnomaly,
    MultiVitalAnomaly,
    CriticalCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertCondition {
    pub description: String,
    pub vital_sign: String,
    pub anomaly_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertDetails {
    pub metrics: HashMap<String, VitalReading>,
    pub rules_triggered: Vec<String>,
    pub anomaly_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMetadata {
    pub raised_by: String,
    pub rule_version: String,
    pub acknowledged: bool,
    pub resolved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,
    pub patient_id: String,
    pub device_id: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub condition: AlertCondition,
    pub details: AlertDetails,
    pub alert_metadata: AlertMetadata,
}
