mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn register_returns_public_fields_and_token() -> Result<()> {
    let (app, _) = common::test_app();
    let (body, token) = common::register(&app, "Ada", "ada@clinic.example").await?;

    assert_eq!(body["name"], "Ada");
    assert_eq!(body["email"], "ada@clinic.example");
    assert_eq!(body["role"], "staff");
    assert!(body["id"].is_string());
    assert!(!token.is_empty());
    // The hash must never appear in any outward shape
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_rejected_case_insensitively() -> Result<()> {
    let (app, _) = common::test_app();
    common::register(&app, "Ada", "ada@clinic.example").await?;

    let (status, body) = common::request(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "name": "Imposter",
            "email": "ADA@Clinic.Example",
            "password": "secret123",
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "User already exists" }));
    Ok(())
}

#[tokio::test]
async fn register_then_login_returns_equivalent_user() -> Result<()> {
    let (app, _) = common::test_app();
    let (registered, _) = common::register(&app, "Ada", "ada@clinic.example").await?;

    let (status, logged_in) = common::request(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ada@clinic.example", "password": "secret123" })),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    for field in ["id", "name", "email", "role"] {
        assert_eq!(logged_in[field], registered[field], "field {}", field);
    }
    assert!(logged_in["token"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_failures_are_byte_identical() -> Result<()> {
    let (app, _) = common::test_app();
    common::register(&app, "Ada", "ada@clinic.example").await?;

    let (wrong_pw_status, wrong_pw_body) = common::request_raw(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ada@clinic.example", "password": "wrong-password" })),
    )
    .await?;
    let (unknown_status, unknown_body) = common::request_raw(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@clinic.example", "password": "secret123" })),
    )
    .await?;

    assert_eq!(wrong_pw_status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown_status, wrong_pw_status);
    assert_eq!(unknown_body, wrong_pw_body);
    Ok(())
}

#[tokio::test]
async fn register_validation_reports_every_failing_field() -> Result<()> {
    let (app, _) = common::test_app();
    let (status, body) = common::request(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "not-an-email", "password": "short" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_object().expect("errors map");
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("email"));
    assert!(errors.contains_key("password"));
    Ok(())
}
