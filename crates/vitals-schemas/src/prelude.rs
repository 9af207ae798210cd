//! Convenience re-exports of the most commonly used types.

pub use crate::alert::{AlertCondition, AlertDetails, AlertEvent, AlertMetadata, AlertType};
pub use crate::envelope::{new_id, EventEnvelope, EventType};
pub use crate::normalized::{NormalizationMetadata, NormalizedEvent, ValidationStatus, VitalsMap};
pub use crate::raw::{Measurement, RawEvent, RawMetadata};
pub use crate::registry::{NullPatientResolver, PatientResolver};
pub use crate::scored::{
    AlertSeverity, AnomalyScore, AnomalyScoresByVital, OverallRiskScore, RuleSeverity,
    ScoredEvent, ScoringMetadata, Severity,
};
pub use crate::vitals::{names, BloodPressureReading, VitalReading};
