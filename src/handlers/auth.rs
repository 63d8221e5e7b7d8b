// handlers/auth.rs - POST /auth/register and POST /auth/login

use axum::{extract::State, http::StatusCode, response::Json};

use crate::error::ApiError;
use crate::services::auth_service::AuthResponse;
use crate::database::models::user::{LoginRequest, RegisterRequest};
use crate::state::AppState;

/// POST /auth/register - create a user account and receive a token
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let registration = body
        .validate()
        .map_err(|errors| ApiError::validation("Please fill all required fields", errors))?;

    let response = state.auth.register(registration).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - authenticate and receive a token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let credentials = body
        .validate()
        .map_err(|errors| ApiError::validation("Please fill all required fields", errors))?;

    let response = state.auth.login(credentials).await?;
    Ok(Json(response))
}
