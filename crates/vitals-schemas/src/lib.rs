//! Wire-format types shared by every stage of the vitals pipeline.
//!
//! This crate owns the canonical shape of every event that crosses the
//! message bus — raw, normalized, scored, and alert — plus the envelope
//! fields every one of them carries and the registry lookup traits
//! consumed (but not implemented) at the enrichment boundary.
//!
//! # Modules
//!
//! - [`envelope`]: event identity, trace propagation, id generation
//! - [`vitals`]: shared vital-reading shapes
//! - [`raw`]: device-originated raw telemetry
//! - [`normalized`]: normalized telemetry after unit/range discipline
//! - [`scored`]: anomaly-scored telemetry
//! - [`alert`]: clinical alert events
//! - [`registry`]: external registry lookup contracts (signatures only)

pub mod alert;
pub mod envelope;
pub mod normalized;
pub mod prelude;
pub mod raw;
pub mod registry;
pub mod scored;
pub mod vitals;

pub use envelope::{EventEnvelope, EventType};
pub use vitals::{BloodPressureReading, VitalReading};
