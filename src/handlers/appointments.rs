// handlers/appointments.rs - clinic-wide appointment book

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::appointment::{
    AppointmentPage, AppointmentView, CreateAppointmentRequest, UpdateAppointmentRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Appointment not found"))
}

/// GET /appointments?page&search - paginated, searchable listing
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<AppointmentPage>, ApiError> {
    let page = state
        .appointments
        .list(query.page.unwrap_or(1), query.search.as_deref())
        .await?;
    Ok(Json(page))
}

/// POST /appointments - book an appointment for an existing patient
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentView>), ApiError> {
    let draft = body
        .validate()
        .map_err(|errors| ApiError::validation("Please fill all required fields", errors))?;
    let appointment = state.appointments.create(draft).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// PUT /appointments/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateAppointmentRequest>,
) -> Result<Json<AppointmentView>, ApiError> {
    let id = parse_id(&id)?;
    let update = body
        .validate()
        .map_err(|errors| ApiError::validation("Invalid appointment fields", errors))?;
    Ok(Json(state.appointments.update(id, update).await?))
}

/// DELETE /appointments/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    state.appointments.delete(id).await?;
    Ok(Json(json!({ "message": "Appointment deleted successfully" })))
}
