//! # API REST
//!
//! REST API for the patient management system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (status codes, JSON bodies, CORS)
//!
//! Uses `api-shared` for request/response bodies and `pms-core` for all data operations.
//!
//! Two status codes are kept for compatibility with existing clients even though they
//! are unusual: a successful create answers `401`, and an unknown id on
//! `GET /patient/{id}` answers `400`.

#![warn(rust_2018_idioms)]

pub mod error;

use api_shared::{
    CreatePatientReq, ErrorRes, HealthRes, HealthService, MessageRes, PatientRes, SortQuery,
    UpdatePatientReq,
};
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use pms_core::{
    patient::record_id, NewPatient, PatientRecord, PatientService, PatientUpdate, SortOrder,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

pub const HOME_MESSAGE: &str = "Patient Management System";
pub const ABOUT_MESSAGE: &str = "API for Patient Management";
pub const CREATED_MESSAGE: &str = "Patient Created SucessFully";
pub const UPDATED_MESSAGE: &str = "Patient Updated Successfully";

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    patient_service: PatientService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        home,
        about,
        health,
        view_all_patients,
        single_patient,
        sort_patients,
        create_patient,
        update_patient,
        delete_patient,
    ),
    components(schemas(
        MessageRes,
        ErrorRes,
        HealthRes,
        PatientRes,
        CreatePatientReq,
        UpdatePatientReq,
    ))
)]
struct ApiDoc;

/// Builds the REST router over `patient_service`, including Swagger UI.
pub fn router(patient_service: PatientService) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/health", get(health))
        .route("/view", get(view_all_patients))
        .route("/patient/:patient_id", get(single_patient))
        .route("/sort", get(sort_patients))
        .route("/create", post(create_patient))
        .route("/update/:patient_id", put(update_patient))
        .route("/delete/:patient_id", delete(delete_patient))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(AppState { patient_service })
}

/// Binds `addr` and serves the REST API until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound or the HTTP server fails while running.
pub async fn serve(patient_service: PatientService, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Serving patient REST API on {}", listener.local_addr()?);
    axum::serve(listener, router(patient_service)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner", body = MessageRes))
)]
async fn home() -> Json<MessageRes> {
    Json(MessageRes::new(HOME_MESSAGE))
}

#[utoipa::path(
    get,
    path = "/about",
    responses((status = 200, description = "Service description", body = MessageRes))
)]
async fn about() -> Json<MessageRes> {
    Json(MessageRes::new(ABOUT_MESSAGE))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
/// Health check endpoint for monitoring and load balancers.
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/view",
    responses(
        (status = 200, description = "All patients, in stored order", body = Vec<PatientRes>),
        (status = 500, description = "Patient file unreadable", body = ErrorRes)
    )
)]
/// List every patient exactly as stored.
#[axum::debug_handler]
async fn view_all_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientRecord>>, ApiError> {
    Ok(Json(state.patient_service.list()?))
}

#[utoipa::path(
    get,
    path = "/patient/{patient_id}",
    params(("patient_id" = String, Path, description = "Patient id from database", example = "P001")),
    responses(
        (status = 200, description = "Patient found", body = PatientRes),
        (status = 400, description = "Invalid Patient Id And Patient Not Found", body = ErrorRes),
        (status = 500, description = "Patient file unreadable", body = ErrorRes)
    )
)]
/// Fetch a single patient by id.
#[axum::debug_handler]
async fn single_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<PatientRecord>, ApiError> {
    state
        .patient_service
        .get(&patient_id)
        .map(Json)
        .map_err(ApiError::for_lookup)
}

#[utoipa::path(
    get,
    path = "/sort",
    params(SortQuery),
    responses(
        (status = 200, description = "Patients sorted by the chosen field", body = Vec<PatientRes>),
        (status = 400, description = "Invalid sort field or order", body = ErrorRes),
        (status = 500, description = "Patient file unreadable", body = ErrorRes)
    )
)]
/// Sorted view of the patients. The stored order is not changed.
#[axum::debug_handler]
async fn sort_patients(
    State(state): State<AppState>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<Vec<PatientRecord>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let sort_by = query.sort_by.unwrap_or_default();
    let order = query
        .order
        .unwrap_or_else(|| SortOrder::default().as_str().to_string());

    Ok(Json(state.patient_service.sort(&sort_by, &order)?))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = CreatePatientReq,
    responses(
        (status = 401, description = "Patient created (legacy status code)", body = String),
        (status = 400, description = "Patient already exists or payload invalid", body = ErrorRes),
        (status = 500, description = "Patient file unreadable or unwritable", body = ErrorRes)
    )
)]
/// Create a new patient. `bmi` and `verdict` are derived from height and weight.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<CreatePatientReq>, JsonRejection>,
) -> Result<(StatusCode, Json<&'static str>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let new_patient = NewPatient::new(req.patient_id, &req.gender, req.height, req.weight)?;
    state.patient_service.create(new_patient)?;

    Ok((StatusCode::UNAUTHORIZED, Json(CREATED_MESSAGE)))
}

#[utoipa::path(
    put,
    path = "/update/{patient_id}",
    request_body = UpdatePatientReq,
    params(("patient_id" = String, Path, description = "Patient id for updating", example = "P001")),
    responses(
        (status = 200, description = "Patient updated", body = MessageRes),
        (status = 400, description = "Payload invalid", body = ErrorRes),
        (status = 404, description = "Patient Not Found", body = ErrorRes),
        (status = 500, description = "Patient file unreadable or unwritable", body = ErrorRes)
    )
)]
/// Overwrite the supplied fields of a patient. `bmi` and `verdict` are not recomputed.
#[axum::debug_handler]
async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    payload: Result<Json<UpdatePatientReq>, JsonRejection>,
) -> Result<Json<MessageRes>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let update = PatientUpdate::new(req.gender.as_deref(), req.height, req.weight)?;
    state.patient_service.update(&patient_id, &update)?;

    Ok(Json(MessageRes::new(UPDATED_MESSAGE)))
}

#[utoipa::path(
    delete,
    path = "/delete/{patient_id}",
    params(("patient_id" = String, Path, description = "Patient id required for deleting", example = "P001")),
    responses(
        (status = 200, description = "Patient deleted", body = String),
        (status = 404, description = "Patient Not Found", body = ErrorRes),
        (status = 500, description = "Patient file unreadable or unwritable", body = ErrorRes)
    )
)]
/// Delete a patient by id.
#[axum::debug_handler]
async fn delete_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<String>, ApiError> {
    let removed = state.patient_service.delete(&patient_id)?;
    let deleted_id = record_id(&removed).unwrap_or(patient_id.as_str());

    Ok(Json(format!("Patient {deleted_id} Deleted Successfully")))
}
