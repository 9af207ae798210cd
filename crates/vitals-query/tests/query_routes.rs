use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use vitals_aggregator::{AggregateStore, InMemoryAggregateStore};
use vitals_query::{router, AppState};

async fn get(path: &str, state: &AppState) -> (StatusCode, Vec<u8>) {
    let app = router(state.clone());
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn health_endpoints_report_ok_against_a_reachable_store() {
    let store = InMemoryAggregateStore::new(900, 3600);
    let state = AppState::new(store);

    let (status, _) = get("/health", &state).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get("/ready", &state).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ready");

    let (status, body) = get("/live", &state).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"alive");
}

#[tokio::test]
async fn unknown_patient_summary_returns_404() {
    let store = InMemoryAggregateStore::new(900, 3600);
    let state = AppState::new(store);

    let (status, _) = get("/stats/patients/no-such-patient/summary", &state).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn known_patient_summary_returns_rolling_stats() {
    use vitals_schemas::normalized::VitalsMap;
    use vitals_schemas::vitals::VitalReading;

    let store = InMemoryAggregateStore::new(900, 3600);
    let vitals = VitalsMap { heart_rate: Some(VitalReading::new(72.0, "bpm", "t")), ..Default::default() };
    store.record_scored("pat-42", &vitals, 0, "2026-07-27T00:00:00Z").await.unwrap();

    let state = AppState::new(store);
    let (status, body) = get("/stats/patients/pat-42/summary", &state).await;
    assert_eq!(status, StatusCode::OK);

    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["rolling_averages"]["heart_rate"]["15m"]["count"], 1);
}

#[tokio::test]
async fn global_alerts_reports_zero_counts_when_empty() {
    let store = InMemoryAggregateStore::new(900, 3600);
    let state = AppState::new(store);

    let (status, body) = get("/stats/global/alerts", &state).await;
    assert_eq!(status, StatusCode::OK);

    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["alerts_per_minute"]["critical"], 0);
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text_format() {
    let store = InMemoryAggregateStore::new(900, 3600);
    let state = AppState::new(store);

    let (status, body) = get("/metrics", &state).await;
    assert_eq!(status, StatusCode::OK);
    // No counters have been incremented yet in this test, so the exposition
    // body may legitimately be empty; it must still be valid UTF-8 text.
    String::from_utf8(body).unwrap();
}
