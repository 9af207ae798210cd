//! Liveness/readiness probes: `/health`, `/ready`, and `/live`. This
//! surface has no database of its own to probe, so `/health` and `/ready`
//! both report on aggregate store reachability instead.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let healthy = state.store.global_alerts(0).await.is_ok();
    Json(HealthResponse {
        status: if healthy { "ok".into() } else { "degraded".into() },
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn readiness_check(State(state): State<AppState>) -> &'static str {
    if state.store.global_alerts(0).await.is_ok() { "ready" } else { "not ready" }
}

async fn liveness_check() -> &'static str {
    "alive"
}
