//! Bounded rolling sample windows per `(patient_id, vital_name)`.
//!
//! The scorer reads `Stats` before scoring a sample and appends it
//! afterward, so the sample never influences its own baseline.
//! Backends are abstract over [`BaselineStore`]; the in-memory
//! implementation here uses `parking_lot` for shared mutable state
//! shared across tokio tasks.

#![warn(missing_docs)]

mod store;

pub use store::InMemoryBaselineStore;

use async_trait::async_trait;
use vitals_errors::ScoringError;

/// Sample mean and sample standard deviation (`n-1` divisor) for a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineStats {
    pub mean: f64,
    pub stddev: f64,
    pub count: usize,
}

/// Per-(patient, vital) bounded sample window, backend-agnostic.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    /// Append `value`, evicting the oldest sample if the window is already
    /// at capacity. Refreshes the window's TTL.
    async fn append(&self, patient_id: &str, vital: &str, value: f64) -> Result<(), ScoringError>;

    /// `None` when fewer than `MIN_SAMPLES` values have been recorded.
    async fn stats(&self, patient_id: &str, vital: &str) -> Result<Option<BaselineStats>, ScoringError>;

    /// Current sample count for the window (0 if it doesn't exist yet).
    async fn count(&self, patient_id: &str, vital: &str) -> Result<usize, ScoringError>;
}
