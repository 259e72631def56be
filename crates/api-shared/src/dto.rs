//! Request and response bodies.
//!
//! These types only describe the wire shape. Field constraints (blank ids, gender values,
//! non-positive measurements) are enforced by `pms-core` when the bodies are converted
//! into core types, so that every surface reports the same validation messages.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// `{"message": ...}` body used by informational and update responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

impl MessageRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{"detail": ...}` body carried by every error response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

impl ErrorRes {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A stored patient record.
///
/// Responses return records exactly as stored, so extra keys written by other tools
/// are passed through untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    #[schema(example = "P001")]
    pub patient_id: String,
    #[schema(example = "male")]
    pub gender: String,
    /// Height in cm.
    pub height: f64,
    /// Weight in kg.
    pub weight: f64,
    pub bmi: f64,
    #[schema(example = "Normal")]
    pub verdict: String,
}

/// Body of `POST /create`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    #[schema(example = "P001")]
    pub patient_id: String,
    /// One of `male`, `female`, `others`.
    pub gender: String,
    /// Height in cm, greater than 0.
    pub height: f64,
    /// Weight in kg, greater than 0.
    pub weight: f64,
}

/// Body of `PUT /update/{patient_id}`.
///
/// Absent keys are left unchanged. An explicit `null` is rejected: stored fields
/// cannot be cleared.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UpdatePatientReq {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub height: Option<f64>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,
}

/// Only called for keys that appear in the body, so `None` always means "absent".
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Query string of `GET /sort`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortQuery {
    /// Sort on the basis of `height`, `weight` or `bmi`.
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub order: Option<String>,
}
