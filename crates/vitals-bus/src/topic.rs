//! The five wire topics.

use std::fmt;

/// One of the five required topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    TelemetryRaw,
    TelemetryNormalized,
    TelemetryEnriched,
    TelemetryScored,
    AlertsRaised,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::TelemetryRaw => "telemetry.raw",
            Topic::TelemetryNormalized => "telemetry.normalized",
            Topic::TelemetryEnriched => "telemetry.enriched",
            Topic::TelemetryScored => "telemetry.scored",
            Topic::AlertsRaised => "alerts.raised",
        }
    }

    pub const ALL: [Topic; 5] = [
        Topic::TelemetryRaw,
        Topic::TelemetryNormalized,
        Topic::TelemetryEnriched,
        Topic::TelemetryScored,
        Topic::AlertsRaised,
    ];
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a new consumer group starts reading from.
///
/// `telemetry.raw` ingress starts from earliest on new groups (replay
/// safe); the aggregator starts from latest (materialized view, not a
/// ledger).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetReset {
    Earliest,
    Latest,
}
