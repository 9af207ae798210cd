//! `/metrics` Prometheus exposition endpoint: a process-global `Registry`
//! plus `IntCounterVec`, behind `std::sync::OnceLock` rather than a
//! third-party lazy-static crate, since the standard library now covers
//! the same need directly.

use std::sync::OnceLock;

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::state::AppState;

static REGISTRY: OnceLock<Registry> = OnceLock::new();
static HTTP_REQUESTS: OnceLock<IntCounterVec> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Counter incremented by callers as requests complete; kept separate from
/// route registration so the metrics route itself stays free of routing
/// middleware concerns.
#[allow(clippy::expect_used)]
pub fn http_requests_total() -> &'static IntCounterVec {
    HTTP_REQUESTS.get_or_init(|| {
        // Metric name/label set is a fixed literal below; the only way
        // either `expect` fires is a typo caught the first time this
        // process starts, not a runtime/data-dependent failure.
        let counter = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests to the query surface"),
            &["method", "path", "status"],
        )
        .expect("valid http_requests_total metric options");
        registry()
            .register(Box::new(counter.clone()))
            .expect("register http_requests_total in the global registry");
        counter
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler))
}

async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();

    let mut buffer = Vec::new();
    if let Err(error) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(%error, "failed to encode prometheus metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, [(CONTENT_TYPE, HeaderValue::from_static("text/plain"))], String::new());
    }

    let body = String::from_utf8(buffer).unwrap_or_default();
    (
        StatusCode::OK,
        [(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        body,
    )
}
