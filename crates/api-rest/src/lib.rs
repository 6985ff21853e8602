//! # API REST
//!
//! REST API implementation for Biopanel.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, path/query extraction)
//!
//! Uses `biopanel-core` for data and `api-shared` for wire types. The router is built by
//! [`router`] so both binaries and the integration tests share one route table.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{wire, HealthService};
use biopanel_core::{MetricKind, Panels, PatientId, PatientService};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    patients: Arc<PatientService>,
    panels: Panels,
}

impl AppState {
    pub fn new(patients: PatientService, panels: Panels) -> Self {
        Self {
            patients: Arc::new(patients),
            panels,
        }
    }
}

/// Query string accepted by the record listing endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordsQuery {
    /// Case-insensitive category filter, e.g. `metabolic`.
    pub category: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_patients, get_patient, list_biomarkers, list_biotrackers),
    components(schemas(
        wire::HealthRes,
        wire::Patient,
        wire::Record,
        wire::ReferenceRange,
        wire::Status,
    ))
)]
pub struct ApiDoc;

/// Builds the full route table with CORS and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/patients", get(list_patients))
        .route("/api/patients/:id", get(get_patient))
        .route("/api/patients/:id/biomarkers", get(list_biomarkers))
        .route("/api/patients/:id/biotrackers", get(list_biotrackers))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = wire::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<wire::HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses(
        (status = 200, description = "List of demo patients", body = [wire::Patient])
    )
)]
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Json<Vec<wire::Patient>> {
    Json(state.patients.list_patients())
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient found", body = wire::Patient),
        (status = 400, description = "Patient id is not an integer"),
        (status = 404, description = "Patient not found")
    )
)]
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<PatientId>,
) -> Result<Json<wire::Patient>, (StatusCode, &'static str)> {
    match state.patients.get_patient(id) {
        Some(patient) => Ok(Json(patient)),
        None => {
            tracing::debug!("patient {} not found", id);
            Err((StatusCode::NOT_FOUND, "Patient not found"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/biomarkers",
    params(("id" = i64, Path, description = "Patient identifier"), RecordsQuery),
    responses(
        (status = 200, description = "Biomarkers for the patient (empty when none match)", body = [wire::Record]),
        (status = 400, description = "Patient id is not an integer")
    )
)]
/// List a patient's biomarkers, optionally filtered by category.
///
/// Unknown patients and categories are not errors: they return an empty array.
#[axum::debug_handler]
async fn list_biomarkers(
    State(state): State<AppState>,
    Path(id): Path<PatientId>,
    Query(query): Query<RecordsQuery>,
) -> Json<Vec<wire::Record>> {
    records_for(&state, MetricKind::Biomarker, id, query)
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}/biotrackers",
    params(("id" = i64, Path, description = "Patient identifier"), RecordsQuery),
    responses(
        (status = 200, description = "Biotrackers for the patient (empty when none match)", body = [wire::Record]),
        (status = 400, description = "Patient id is not an integer")
    )
)]
#[axum::debug_handler]
async fn list_biotrackers(
    State(state): State<AppState>,
    Path(id): Path<PatientId>,
    Query(query): Query<RecordsQuery>,
) -> Json<Vec<wire::Record>> {
    records_for(&state, MetricKind::Biotracker, id, query)
}

fn records_for(
    state: &AppState,
    kind: MetricKind,
    patient_id: PatientId,
    query: RecordsQuery,
) -> Json<Vec<wire::Record>> {
    let records = state
        .panels
        .query(kind)
        .records_for_patient(patient_id, query.category.as_deref());
    Json(records)
}
