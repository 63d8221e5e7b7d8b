use axum::response::Json;
use serde_json::{json, Value};

pub mod appointments;
pub mod auth;
pub mod patients;

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "MedKlinika API (Rust)",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "MedKlinika API is running",
    }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
    }))
}
