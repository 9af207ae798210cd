//! Snapshot tests pinning the wire JSON shape of each topic's event type.
//! A snapshot failure here means a wire-format change that every
//! downstream consumer needs to know about, not necessarily a bug.

use vitals_schemas::envelope::{EventEnvelope, EventType};
use vitals_schemas::normalized::{NormalizationMetadata, NormalizedEvent, ValidationStatus, VitalsMap};
use vitals_schemas::raw::{Measurement, RawEvent, RawMetadata};
use vitals_schemas::vitals::VitalReading;

fn envelope(event_type: EventType) -> EventEnvelope {
    EventEnvelope {
        event_id: "evt_00000000".to_string(),
        trace_id: "trace_00000000".to_string(),
        source_event_id: None,
        event_type,
        version: "1.0.0".to_string(),
        timestamp: "2026-07-27T12:00:00Z".to_string(),
    }
}

#[test]
fn raw_event_wire_shape() {
    let event = RawEvent {
        envelope: envelope(EventType::TelemetryRaw),
        device_id: "dev-1".to_string(),
        timestamp: serde_json::json!("2026-07-27T12:00:00Z"),
        measurements: vec![
            Measurement { metric: "heart_rate".to_string(), value: 72.0, unit: Some("bpm".to_string()) },
            Measurement { metric: "spo2".to_string(), value: 98.0, unit: Some("percent".to_string()) },
        ],
        metadata: RawMetadata { patient_id: Some("pat-1".to_string()) },
        patient_id: Some("pat-1".to_string()),
    };

    insta::assert_json_snapshot!(event);
}

#[test]
fn normalized_event_wire_shape() {
    let event = NormalizedEvent {
        envelope: envelope(EventType::TelemetryNormalized),
        device_id: "dev-1".to_string(),
        patient_id: "pat-1".to_string(),
        vitals: VitalsMap {
            heart_rate: Some(VitalReading::new(72.0, "bpm", "2026-07-27T12:00:00Z")),
            oxygen_saturation: Some(VitalReading::new(98.0, "percent", "2026-07-27T12:00:00Z")),
            temperature: None,
            respiratory_rate: None,
            blood_pressure: None,
            other: Default::default(),
        },
        validation_status: ValidationStatus::Valid,
        normalization_metadata: NormalizationMetadata {
            normalized_at: "2026-07-27T12:00:01Z".to_string(),
            rules_version: "1.0.0".to_string(),
            warnings: vec![],
        },
    };

    insta::assert_json_snapshot!(event);
}
