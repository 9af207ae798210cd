//! Read-only HTTP surface over the aggregate store: patient rolling-average
//! summaries and global per-minute alert counts, plus the health/readiness
//! and Prometheus routes every long-running service here carries.
//!
//! Routes are grouped one module per domain under [`routes`], the way a
//! per-domain `api/routes/` layout splits handlers. `utoipa` OpenAPI
//! annotations are deliberately not carried: `utoipa` is absent from this
//! workspace's dependency set and there's no generated API docs target.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Builds the full query-surface router over the given [`AppState`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::stats::router())
        .merge(routes::metrics::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
