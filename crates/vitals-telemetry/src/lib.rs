//! Structured JSON logging setup for vitals pipeline services.
//!
//! Every service calls [`init`] once at startup. Record shape on the wire
//! is `{timestamp, level, service, logger, message, event_id?, trace_id?,
//! ...}` — `service` is attached as a root span field so every event
//! nested under it inherits it; `event_id`/`trace_id` are attached
//! per-event via `tracing::info!(event_id = %.., trace_id = %.., ...)` or
//! via `#[tracing::instrument(fields(event_id = %.., trace_id = %..))]`
//! at stage entry points.

use tracing::Span;
use tracing_subscriber::EnvFilter;

/// Initialize the global JSON tracing subscriber for `service_name`.
///
/// Returns the root [`Span`] every stage task should enter so its log
/// records carry `service` consistently.
pub fn init(service_name: &str, default_level: &str) -> Span {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .with_current_span(true)
        .init();

    tracing::info_span!("service", service = %service_name.to_string())
}
