//! Registry read interfaces consumed (not owned) by the enrichment boundary.
//!
//! The relational registry of patients/devices/thresholds is an external
//! collaborator, out of scope for this workspace. These traits describe
//! the shape the core expects from it; no implementation lives in this
//! crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    pub age: Option<u32>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub current_medications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: String,
    pub patient_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    pub patient_id: String,
    pub hr_max: Option<f64>,
    pub spo2_min: Option<f64>,
    pub temp_max_f: Option<f64>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("registry unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PatientRegistry: Send + Sync {
    async fn get_patient(&self, patient_id: &str) -> Result<Patient, RegistryError>;
    async fn get_threshold_profile(&self, patient_id: &str) -> Result<ThresholdProfile, RegistryError>;
}

#[async_trait]
pub trait DeviceRegistry: Send + Sync {
    async fn get_device(&self, device_id: &str) -> Result<Device, RegistryError>;
}

/// Resolves a raw event's owning patient, the one registry lookup the core
/// normalizer itself performs — the production path consults the
/// registry, the core treats it as injected.
#[async_trait]
pub trait PatientResolver: Send + Sync {
    async fn resolve(&self, device_id: &str, hinted_patient_id: Option<&str>) -> String;
}

/// Default resolver used outside production: prefers the hint, otherwise
/// synthesizes `patient_from_<device_id>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPatientResolver;

#[async_trait]
impl PatientResolver for NullPatientResolver {
    async fn resolve(&self, device_id: &str, hinted_patient_id: Option<&str>) -> String {
        match hinted_patient_id {
            Some(id) => id.to_string(),
            None => format!("patient_from_{device_id}"),
        }
    }
}
