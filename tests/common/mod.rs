use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use medklinika_api::auth::TokenService;
use medklinika_api::database::memory::MemoryStore;
use medklinika_api::state::AppState;

pub const TEST_SECRET: &str = "test-secret";

/// Router over a fresh in-memory store, plus the token service it was
/// built with (for issuing tokens out of band).
pub fn test_app() -> (Router, TokenService) {
    let store = Arc::new(MemoryStore::new());
    let tokens = TokenService::new(TEST_SECRET, 24).expect("token service");
    let state = AppState::new(store.clone(), store.clone(), store, tokens.clone());
    (medklinika_api::app(state), tokens)
}

/// Issue a request and return status plus raw body bytes. Byte-level
/// access matters for the tests that assert identical error bodies.
pub async fn request_raw(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Vec<u8>)> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, bytes.to_vec()))
}

/// Issue a request and parse the JSON body.
pub async fn request(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let (status, bytes) = request_raw(router, method, path, token, body).await?;
    let json = serde_json::from_slice(&bytes)?;
    Ok((status, json))
}

/// Register a user and return (user json, token).
pub async fn register(router: &Router, name: &str, email: &str) -> Result<(Value, String)> {
    let (status, body) = request(
        router,
        Method::POST,
        "/auth/register",
        None,
        Some(serde_json::json!({
            "name": name,
            "email": email,
            "password": "secret123",
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let token = body["token"].as_str().expect("token in response").to_string();
    Ok((body, token))
}

/// Create a patient as the given user and return its id.
pub async fn create_patient(router: &Router, token: &str, name: &str) -> Result<String> {
    let (status, body) = request(
        router,
        Method::POST,
        "/patients",
        Some(token),
        Some(serde_json::json!({ "name": name, "gender": "other" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED, "create patient failed: {}", body);
    Ok(body["id"].as_str().expect("patient id").to_string())
}
