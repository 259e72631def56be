//! Mapping from core errors to HTTP responses.
//!
//! Every failure becomes a status code plus an `{"detail": ...}` body carrying the
//! human-readable message. Nothing is retried.

use api_shared::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pms_core::PatientError;

/// Detail returned by `GET /patient/{id}` for an unknown id.
pub const SINGLE_PATIENT_NOT_FOUND: &str = "Invalid Patient Id And Patient Not Found";

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    /// Like the `From` conversion, except an unknown id is reported as a bad request.
    /// Single-patient lookup has always answered 400 here and clients depend on it.
    pub fn for_lookup(err: PatientError) -> Self {
        match err {
            PatientError::NotFound(id) => {
                tracing::warn!("patient lookup failed: {}", id);
                Self::bad_request(SINGLE_PATIENT_NOT_FOUND)
            }
            other => other.into(),
        }
    }
}

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        if err.is_persistence() {
            tracing::error!("patient store error: {:?}", err);
            return Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string());
        }

        let status = match &err {
            PatientError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        tracing::warn!("request rejected ({}): {}", status, err);
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorRes::new(self.detail))).into_response()
    }
}
