//! Event identity and trace propagation.
//!
//! Every message on every topic carries an [`EventEnvelope`]. `trace_id` is
//! propagated unchanged from the first ingress event in a chain;
//! `source_event_id` points at the immediate upstream message, letting a
//! consumer walk the chain back to the raw reading that started it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The five wire event types, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[serde(rename = "telemetry.raw")]
    TelemetryRaw,
    #[serde(rename = "telemetry.normalized")]
    TelemetryNormalized,
    #[serde(rename = "telemetry.enriched")]
    TelemetryEnriched,
    #[serde(rename = "telemetry.scored")]
    TelemetryScored,
    #[serde(rename = "alerts.raised")]
    AlertsRaised,
}

impl EventType {
    /// The five-hex-group id prefix used for ids minted for this event type.
    pub fn id_prefix(self) -> &'static str {
        match self {
            EventType::AlertsRaised => "alert",
            _ => "evt",
        }
    }
}

/// Wire-format version carried on every envelope.
pub const WIRE_VERSION: &str = "1.0.0";

/// Identity and correlation fields present on every message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: String,
    pub trace_id: String,
    pub source_event_id: Option<String>,
    pub event_type: EventType,
    pub version: String,
    /// RFC 3339 UTC timestamp of event occurrence, `Z`-suffixed.
    pub timestamp: String,
}

impl EventEnvelope {
    /// Mint the envelope for a fresh ingress event (no parent).
    ///
    /// `trace_id` is synthesized and becomes the root of this event's trace;
    /// it never changes as the event is transformed downstream.
    pub fn ingress(event_type: EventType, timestamp: impl Into<String>) -> Self {
        Self {
            event_id: new_id("evt"),
            trace_id: new_id("trace"),
            source_event_id: None,
            event_type,
            version: WIRE_VERSION.to_string(),
            timestamp: timestamp.into(),
        }
    }

    /// Derive a child envelope from a parent event, preserving `trace_id`
    /// and pointing `source_event_id` at the parent's `event_id`.
    pub fn derive(&self, event_type: EventType, timestamp: impl Into<String>) -> Self {
        Self {
            event_id: new_id(event_type.id_prefix()),
            trace_id: self.trace_id.clone(),
            source_event_id: Some(self.event_id.clone()),
            event_type,
            version: WIRE_VERSION.to_string(),
            timestamp: timestamp.into(),
        }
    }
}

/// Generate a fresh id of the form `<prefix>_aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee`.
///
/// Backed by `Uuid::new_v4`, which is process-safe under concurrent use.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4())
}
