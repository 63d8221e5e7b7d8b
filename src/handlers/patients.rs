// handlers/patients.rs - owner-scoped patient CRUD

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::patient::{CreatePatientRequest, Patient, UpdatePatientRequest};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// An unparseable id gets the same response as a missing record.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Patient not found"))
}

/// GET /patients - list the caller's patients
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    Ok(Json(state.patients.list(&user).await?))
}

/// POST /patients - create a patient owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<CreatePatientRequest>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let draft = body
        .validate()
        .map_err(|errors| ApiError::validation("Please fill all required fields", errors))?;
    let patient = state.patients.create(&user, draft).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// GET /patients/:id
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.patients.get(&user, id).await?))
}

/// PUT /patients/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdatePatientRequest>,
) -> Result<Json<Patient>, ApiError> {
    let id = parse_id(&id)?;
    let update = body
        .validate()
        .map_err(|errors| ApiError::validation("Invalid patient fields", errors))?;
    Ok(Json(state.patients.update(&user, id, update).await?))
}

/// DELETE /patients/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state.patients.delete(&user, id).await?;
    Ok(Json(json!({ "message": "Patient removed" })))
}
