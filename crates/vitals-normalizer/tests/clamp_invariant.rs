use proptest::prelude::*;
use vitals_schemas::envelope::{EventEnvelope, EventType};
use vitals_schemas::raw::{Measurement, RawEvent, RawMetadata};
use vitals_schemas::registry::NullPatientResolver;

proptest! {
    #[test]
    fn heart_rate_is_always_clamped_into_range(value in -1000.0f64..1000.0) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let raw = RawEvent {
            envelope: EventEnvelope::ingress(EventType::TelemetryRaw, "2024-01-01T00:00:00Z"),
            device_id: "device-1".to_string(),
            timestamp: serde_json::json!("2024-01-01T00:00:00Z"),
            measurements: vec![Measurement { metric: "hr".to_string(), value, unit: None }],
            metadata: RawMetadata::default(),
            patient_id: None,
        };

        let normalized = rt
            .block_on(vitals_normalizer::normalize(&raw, &NullPatientResolver))
            .unwrap();
        let hr = normalized.vitals.heart_rate.unwrap().value;
        prop_assert!(hr >= 20.0 && hr <= 240.0);
    }
}
