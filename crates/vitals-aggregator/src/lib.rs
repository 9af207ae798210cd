//! Rolling per-patient stats, `last_vitals` snapshots, and per-minute
//! alert counters, behind a backend-agnostic [`AggregateStore`] trait.

pub mod memory;
pub mod rolling;
pub mod stage;
#[cfg(feature = "redis-backend")]
pub mod redis_store;

pub use memory::InMemoryAggregateStore;
pub use rolling::RollingStats;
pub use stage::AggregatorStage;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vitals_errors::AggregateError;
use vitals_schemas::normalized::VitalsMap;
use vitals_schemas::scored::Severity;

/// The four severity classes alert counters are bucketed into.
/// `Severity::Normal` never appears here since alerts are never raised at
/// OK/Normal severity; any alert whose carried anomaly score nonetheless
/// maps to `Normal` is counted as `Low`.
pub const ALERT_SEVERITY_CLASSES: [&str; 4] = ["low", "medium", "high", "critical"];

pub fn alert_counter_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Normal | Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
        Severity::Critical => "critical",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastVitalsSnapshot {
    pub vitals: VitalsMap,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalRollingStats {
    #[serde(rename = "15m", skip_serializing_if = "Option::is_none")]
    pub window_15m: Option<RollingStats>,
    #[serde(rename = "1h", skip_serializing_if = "Option::is_none")]
    pub window_1h: Option<RollingStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub last_vitals: Option<LastVitalsSnapshot>,
    pub rolling_averages: HashMap<String, VitalRollingStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalAlerts {
    pub alerts_per_minute: HashMap<String, u64>,
    pub timestamp: String,
}

/// Backend-agnostic aggregate store. `event_timestamp` is always the
/// scored/alert event's own timestamp (unix seconds), not wall-clock time
/// at the moment of ingestion — replay and out-of-order delivery must
/// evict relative to event time.
#[async_trait]
pub trait AggregateStore: Send + Sync {
    async fn record_scored(
        &self,
        patient_id: &str,
        vitals: &VitalsMap,
        event_timestamp: i64,
        updated_at: &str,
    ) -> Result<(), AggregateError>;

    async fn record_alert(&self, severity: Severity, event_timestamp: i64) -> Result<(), AggregateError>;

    async fn patient_summary(&self, patient_id: &str) -> Result<PatientSummary, AggregateError>;

    /// `now` is wall-clock unix seconds at query time — the current-or-
    /// previous-minute fallback is read-time behavior, not tied to any
    /// particular event.
    async fn global_alerts(&self, now: i64) -> Result<GlobalAlerts, AggregateError>;
}
