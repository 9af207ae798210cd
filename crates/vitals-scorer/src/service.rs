//! The [`ScorerService`](proto::scorer_service_server::ScorerService)
//! gRPC server: wraps the pure scoring functions in [`crate::scoring`] with
//! baseline reads/appends.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use vitals_baseline::BaselineStore;

use crate::proto::scorer_service_server::ScorerService;
use crate::proto::{
    ScoreOverallRequest, ScoreOverallResponse, ScoreVitalRequest, ScoreVitalResponse, VitalValue,
};
use crate::scoring::{score_overall, score_vital};

/// Bumped whenever the scoring formula changes; stamped onto every
/// [`ScoreVitalResponse`] as `model_version`.
pub const MODEL_VERSION: &str = "vitals-scorer-1.0.0";

pub struct ScorerServiceImpl {
    baseline: Arc<dyn BaselineStore>,
}

impl ScorerServiceImpl {
    pub fn new(baseline: Arc<dyn BaselineStore>) -> Self {
        Self { baseline }
    }
}

#[tonic::async_trait]
impl ScorerService for ScorerServiceImpl {
    async fn score_vital(
        &self,
        request: Request<ScoreVitalRequest>,
    ) -> Result<Response<ScoreVitalResponse>, Status> {
        let req = request.into_inner();

        let stats = self
            .baseline
            .stats(&req.patient_id, &req.vital)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;
        let sample_count = self
            .baseline
            .count(&req.patient_id, &req.vital)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;

        let result = score_vital(&req.vital, req.value, stats, sample_count);

        self.baseline
            .append(&req.patient_id, &req.vital, req.value)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;

        Ok(Response::new(ScoreVitalResponse {
            score: result.score,
            severity: severity_wire_name(result.severity),
            is_anomaly: result.is_anomaly,
            model_version: MODEL_VERSION.to_string(),
            factors: result.factors,
        }))
    }

    async fn score_overall(
        &self,
        request: Request<ScoreOverallRequest>,
    ) -> Result<Response<ScoreOverallResponse>, Status> {
        let req = request.into_inner();

        let find = |name: &str| -> Option<f64> {
            req.vitals
                .iter()
                .find(|v: &&VitalValue| v.vital == name)
                .map(|v| v.value)
        };

        let score = score_overall(find("heart_rate"), find("oxygen_saturation"), find("temperature"));
        let severity = vitals_schemas::scored::Severity::from_score(score);

        Ok(Response::new(ScoreOverallResponse {
            score,
            severity: severity_wire_name(severity),
            is_anomaly: score > 0.5,
            aggregation_method: "weighted_mean_core_vitals".to_string(),
        }))
    }
}

fn severity_wire_name(severity: vitals_schemas::scored::Severity) -> String {
    use vitals_schemas::scored::Severity::*;
    match severity {
        Normal => "normal",
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
    .to_string()
}
