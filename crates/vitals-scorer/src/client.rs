//! Client used by `vitals-pipeline` to call the scorer over gRPC, with a
//! fixed per-call deadline (default 5s).

use std::time::Duration;

use tonic::transport::Channel;
use vitals_errors::ScoringError;

use crate::proto::scorer_service_client::ScorerServiceClient;
use crate::proto::{ScoreOverallRequest, ScoreVitalRequest, VitalValue};

pub struct ScorerClient {
    inner: ScorerServiceClient<Channel>,
    deadline: Duration,
}

/// A single vital's score, decoded off the wire.
#[derive(Debug, Clone)]
pub struct ScoredVital {
    pub score: f64,
    pub severity: String,
    pub is_anomaly: bool,
    pub model_version: String,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScoredOverall {
    pub score: f64,
    pub severity: String,
    pub is_anomaly: bool,
    pub aggregation_method: String,
}

impl ScorerClient {
    pub async fn connect(url: &str, deadline: Duration) -> Result<Self, ScoringError> {
        let channel = Channel::from_shared(url.to_string())
            .map_err(|e| ScoringError::Transport(e.to_string()))?
            .connect()
            .await
            .map_err(|e| ScoringError::Transport(e.to_string()))?;

        Ok(Self {
            inner: ScorerServiceClient::new(channel),
            deadline,
        })
    }

    pub async fn score_vital(
        &self,
        patient_id: &str,
        vital: &str,
        value: f64,
    ) -> Result<ScoredVital, ScoringError> {
        let request = tonic::Request::new(ScoreVitalRequest {
            patient_id: patient_id.to_string(),
            vital: vital.to_string(),
            value,
        });

        let mut client = self.inner.clone();
        let response = tokio::time::timeout(self.deadline, client.score_vital(request))
            .await
            .map_err(|_| ScoringError::Timeout(self.deadline))?
            .map_err(|status| ScoringError::Transport(status.to_string()))?
            .into_inner();

        Ok(ScoredVital {
            score: response.score,
            severity: response.severity,
            is_anomaly: response.is_anomaly,
            model_version: response.model_version,
            factors: response.factors,
        })
    }

    pub async fn score_overall(
        &self,
        patient_id: &str,
        vitals: &[(String, f64)],
    ) -> Result<ScoredOverall, ScoringError> {
        let request = tonic::Request::new(ScoreOverallRequest {
            patient_id: patient_id.to_string(),
            vitals: vitals
                .iter()
                .map(|(vital, value)| VitalValue {
                    vital: vital.clone(),
                    value: *value,
                })
                .collect(),
        });

        let mut client = self.inner.clone();
        let response = tokio::time::timeout(self.deadline, client.score_overall(request))
            .await
            .map_err(|_| ScoringError::Timeout(self.deadline))?
            .map_err(|status| ScoringError::Transport(status.to_string()))?
            .into_inner();

        Ok(ScoredOverall {
            score: response.score,
            severity: response.severity,
            is_anomaly: response.is_anomaly,
            aggregation_method: response.aggregation_method,
        })
    }
}
