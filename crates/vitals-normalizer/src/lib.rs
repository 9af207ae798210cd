//! Raw telemetry → normalized telemetry.
//!
//! [`normalize`] is the whole stage as a pure-ish async function: it parses
//! the permissive timestamp, canonicalizes metric names, clamps into
//! range, merges blood pressure, and resolves `patient_id` via an injected
//! [`vitals_schemas::registry::PatientResolver`]. `vitals-pipeline` wraps it
//! in a consume/produce loop.

mod alias;
mod clamp;
mod timestamp;

use vitals_errors::NormalizeError;
use vitals_schemas::envelope::EventType;
use vitals_schemas::normalized::{NormalizationMetadata, NormalizedEvent, ValidationStatus, VitalsMap};
use vitals_schemas::registry::PatientResolver;
use vitals_schemas::raw::RawEvent;
use vitals_schemas::vitals::{names, BloodPressureReading, VitalReading};

/// Normalization rules version stamped onto every normalized event.
pub const RULES_VERSION: &str = "1.0.0";

/// Normalize one raw event. Returns [`NormalizeError::NoMeasurements`] when
/// there is nothing to emit — the caller logs and drops the event rather
/// than producing an empty normalized event.
pub async fn normalize(
    raw: &RawEvent,
    resolver: &dyn PatientResolver,
) -> Result<NormalizedEvent, NormalizeError> {
    if raw.measurements.is_empty() {
        return Err(NormalizeError::NoMeasurements);
    }

    let parsed_timestamp = timestamp::parse(&raw.timestamp);
    let event_timestamp = parsed_timestamp.rfc3339;

    let mut vitals = VitalsMap::default();
    let mut warnings = Vec::new();
    if parsed_timestamp.substituted {
        warnings.push(format!(
            "could not parse timestamp {:?}, substituted current UTC time",
            raw.timestamp
        ));
    }

    for measurement in &raw.measurements {
        let canonical = alias::canonicalize(&measurement.metric);
        let unit = measurement.unit.clone();

        match canonical.as_str() {
            n if n == names::HEART_RATE => {
                let (value, warning) = clamp::clamp(&clamp::HEART_RATE, measurement.value, n);
                warnings.extend(warning);
                vitals.heart_rate = Some(VitalReading::new(
                    value,
                    unit.unwrap_or_else(|| clamp::HEART_RATE.default_unit.to_string()),
                    event_timestamp.clone(),
                ));
            }
            n if n == names::OXYGEN_SATURATION => {
                let (value, warning) = clamp::clamp(&clamp::OXYGEN_SATURATION, measurement.value, n);
                warnings.extend(warning);
                vitals.oxygen_saturation = Some(VitalReading::new(
                    value,
                    unit.unwrap_or_else(|| clamp::OXYGEN_SATURATION.default_unit.to_string()),
                    event_timestamp.clone(),
                ));
            }
            n if n == names::TEMPERATURE => {
                let (value, warning) = clamp::clamp(&clamp::TEMPERATURE, measurement.value, n);
                warnings.extend(warning);
                vitals.temperature = Some(VitalReading::new(
                    value,
                    unit.unwrap_or_else(|| clamp::TEMPERATURE.default_unit.to_string()),
                    event_timestamp.clone(),
                ));
            }
            n if n == names::SYSTOLIC_PRESSURE => {
                let bp = vitals.blood_pressure.get_or_insert_with(BloodPressureReading::default);
                bp.systolic = Some(measurement.value);
                bp.unit.get_or_insert_with(|| "mmHg".to_string());
                bp.timestamp.get_or_insert_with(|| event_timestamp.clone());
            }
            n if n == names::DIASTOLIC_PRESSURE => {
                let bp = vitals.blood_pressure.get_or_insert_with(BloodPressureReading::default);
                bp.diastolic = Some(measurement.value);
                bp.unit.get_or_insert_with(|| "mmHg".to_string());
                bp.timestamp.get_or_insert_with(|| event_timestamp.clone());
            }
            n if n == names::RESPIRATORY_RATE => {
                vitals.respiratory_rate = Some(VitalReading::new(
                    measurement.value,
                    unit.unwrap_or_else(|| "breaths_per_minute".to_string()),
                    event_timestamp.clone(),
                ));
            }
            other => {
                vitals.other.insert(
                    other.to_string(),
                    VitalReading::new(
                        measurement.value,
                        unit.unwrap_or_else(|| "unknown".to_string()),
                        event_timestamp.clone(),
                    ),
                );
            }
        }
    }

    let validation_status = if warnings.is_empty() {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Warning
    };

    let patient_id = resolver
        .resolve(&raw.device_id, raw.metadata.patient_id.as_deref().or(raw.patient_id.as_deref()))
        .await;

    let envelope = raw.envelope.derive(EventType::TelemetryNormalized, event_timestamp.clone());

    Ok(NormalizedEvent {
        envelope,
        device_id: raw.device_id.clone(),
        patient_id,
        vitals,
        validation_status,
        normalization_metadata: NormalizationMetadata {
            normalized_at: event_timestamp,
            rules_version: RULES_VERSION.to_string(),
            warnings,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_schemas::envelope::EventEnvelope;
    use vitals_schemas::raw::{Measurement, RawMetadata};
    use vitals_schemas::registry::NullPatientResolver;

    fn raw_event(measurements: Vec<Measurement>) -> RawEvent {
        RawEvent {
            envelope: EventEnvelope::ingress(EventType::TelemetryRaw, "2024-01-01T00:00:00Z"),
            device_id: "device-1".to_string(),
            timestamp: serde_json::json!("2024-01-01T00:00:00Z"),
            measurements,
            metadata: RawMetadata::default(),
            patient_id: None,
        }
    }

    #[tokio::test]
    async fn no_measurements_is_rejected() {
        let raw = raw_event(vec![]);
        let err = normalize(&raw, &NullPatientResolver).await.unwrap_err();
        assert!(matches!(err, NormalizeError::NoMeasurements));
    }

    #[tokio::test]
    async fn patient_id_falls_back_to_device_derived_placeholder() {
        let raw = raw_event(vec![Measurement { metric: "hr".into(), value: 72.0, unit: None }]);
        let normalized = normalize(&raw, &NullPatientResolver).await.unwrap();
        assert_eq!(normalized.patient_id, "patient_from_device-1");
    }

    #[tokio::test]
    async fn metadata_patient_id_takes_precedence() {
        let mut raw = raw_event(vec![Measurement { metric: "hr".into(), value: 72.0, unit: None }]);
        raw.metadata.patient_id = Some("patient-42".to_string());
        let normalized = normalize(&raw, &NullPatientResolver).await.unwrap();
        assert_eq!(normalized.patient_id, "patient-42");
    }

    #[tokio::test]
    async fn clamped_value_marks_event_as_warning() {
        let raw = raw_event(vec![Measurement { metric: "hr".into(), value: 999.0, unit: None }]);
        let normalized = normalize(&raw, &NullPatientResolver).await.unwrap();
        assert_eq!(normalized.validation_status, ValidationStatus::Warning);
        assert_eq!(normalized.vitals.heart_rate.unwrap().value, 240.0);
    }

    #[tokio::test]
    async fn systolic_and_diastolic_merge_into_one_blood_pressure_reading() {
        let raw = raw_event(vec![
            Measurement { metric: "systolic".into(), value: 120.0, unit: None },
            Measurement { metric: "diastolic".into(), value: 80.0, unit: None },
        ]);
        let normalized = normalize(&raw, &NullPatientResolver).await.unwrap();
        let bp = normalized.vitals.blood_pressure.unwrap();
        assert_eq!(bp.systolic, Some(120.0));
        assert_eq!(bp.diastolic, Some(80.0));
    }

    #[tokio::test]
    async fn missing_half_of_blood_pressure_stays_null() {
        let raw = raw_event(vec![Measurement { metric: "systolic".into(), value: 120.0, unit: None }]);
        let normalized = normalize(&raw, &NullPatientResolver).await.unwrap();
        let bp = normalized.vitals.blood_pressure.unwrap();
        assert_eq!(bp.systolic, Some(120.0));
        assert_eq!(bp.diastolic, None);
    }

    #[tokio::test]
    async fn unknown_metric_passes_through_into_other() {
        let raw = raw_event(vec![Measurement { metric: "GlucoseLevel".into(), value: 110.0, unit: None }]);
        let normalized = normalize(&raw, &NullPatientResolver).await.unwrap();
        assert!(normalized.vitals.other.contains_key("glucoselevel"));
    }

    #[tokio::test]
    async fn no_warnings_means_valid() {
        let raw = raw_event(vec![Measurement { metric: "hr".into(), value: 72.0, unit: None }]);
        let normalized = normalize(&raw, &NullPatientResolver).await.unwrap();
        assert_eq!(normalized.validation_status, ValidationStatus::Valid);
    }
}
