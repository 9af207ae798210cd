//! Maps [`QueryError`] onto HTTP responses: a small `match` translating a
//! domain error into a transport-specific response type (`StatusCode` plus
//! a JSON error body), the same shape used elsewhere in this codebase to
//! translate domain errors into `tonic::Status` for the gRPC surface.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use vitals_errors::QueryError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = match &self {
            QueryError::PatientNotFound(_) => StatusCode::NOT_FOUND,
            QueryError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody { error: self.to_string() };
        (status, Json(body)).into_response()
    }
}
