//! Centralized error types for the vitals pipeline.
//!
//! Each stage gets its own error enum; [`VitalsError`] composes them into a
//! single type so a binary can match on `source()` without every crate
//! depending on every other crate's error type directly.
//!
//! # Disposition
//!
//! Error disposition (log-and-skip vs. clamp-and-warn vs. degrade-and-continue
//! vs. abort) is a property of *where* an error is handled, not of the error
//! type itself. This crate only classifies severity and recoverability;
//! callers decide what to do with each variant.

#![warn(missing_docs)]

use thiserror::Error;

/// Top-level error type composing every stage's error enum.
#[derive(Debug, Error)]
pub enum VitalsError {
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("rules error: {0}")]
    Rules(#[from] RulesError),

    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    #[error("aggregate store error: {0}")]
    Aggregate(#[from] AggregateError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Severity used for log-level selection and alerting on internal faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Warn,
    Error,
    Critical,
}

/// Errors raised while turning a raw event into a normalized one.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("malformed raw event: {0}")]
    Malformed(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("no measurements present")]
    NoMeasurements,
}

impl NormalizeError {
    /// All normalize errors are log-and-skip: they never abort the
    /// consumer loop.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warn
    }
}

/// Errors raised calling or running the anomaly scorer.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("scorer RPC timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("scorer RPC transport error: {0}")]
    Transport(String),

    #[error("scorer returned invalid request status")]
    InvalidRequest,

    #[error("baseline store error: {0}")]
    Baseline(String),
}

impl ScoringError {
    /// Timeouts and transport failures are recoverable via the degraded
    /// scored-event fallback; nothing here aborts the stage.
    pub fn is_degradable(&self) -> bool {
        matches!(self, ScoringError::Timeout(_) | ScoringError::Transport(_))
    }
}

/// Errors raised evaluating threshold rules.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("missing vitals on enriched event")]
    MissingVitals,
}

/// Errors raised by the message bus abstraction.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("failed to connect to bus: {0}")]
    ConnectFailed(String),

    #[error("failed to produce message: {0}")]
    ProduceFailed(String),

    #[error("failed to consume message: {0}")]
    ConsumeFailed(String),

    #[error("message decode error: {0}")]
    Decode(String),
}

impl BusError {
    /// Connection failures are startup failures (abort process, let the
    /// orchestrator restart); produce/consume/decode failures are handled
    /// per-message.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, BusError::ConnectFailed(_))
    }
}

/// Errors raised by the aggregate KV store or the query API reading it.
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("store I/O error: {0}")]
    Io(String),

    #[error("store connect failed: {0}")]
    ConnectFailed(String),
}

/// Errors surfaced by the read-only query API.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("patient not found: {0}")]
    PatientNotFound(String),

    #[error("aggregate store error: {0}")]
    Store(#[from] AggregateError),
}
