//! `GET /stats/patients/{patient_id}/summary` and `GET /stats/global/alerts`,
//! following the same per-domain route-module convention as the rest of
//! `routes`: a `pub fn router() -> Router<AppState>` plus handlers reading
//! state through the `State` extractor.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use vitals_aggregator::{GlobalAlerts, PatientSummary};
use vitals_errors::QueryError;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats/patients/:patient_id/summary", get(patient_summary))
        .route("/stats/global/alerts", get(global_alerts))
}

async fn patient_summary(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientSummary>, QueryError> {
    let summary = state.store.patient_summary(&patient_id).await?;
    if summary.last_vitals.is_none() && summary.rolling_averages.is_empty() {
        return Err(QueryError::PatientNotFound(patient_id));
    }
    Ok(Json(summary))
}

async fn global_alerts(State(state): State<AppState>) -> Result<Json<GlobalAlerts>, QueryError> {
    let now = chrono::Utc::now().timestamp();
    let alerts = state.store.global_alerts(now).await?;
    Ok(Json(alerts))
}
