mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
async fn create_stamps_the_authenticated_user_as_owner() -> Result<()> {
    let (app, _) = common::test_app();
    let (user, token) = common::register(&app, "Ada", "ada@clinic.example").await?;

    let (status, patient) = common::request(
        &app,
        Method::POST,
        "/patients",
        Some(&token),
        Some(json!({
            "name": "Jo",
            "gender": "female",
            "date_of_birth": "1990-12-31",
            // A client-supplied owner is not part of the schema and is dropped
            "created_by": "00000000-0000-0000-0000-000000000000",
        })),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(patient["created_by"], user["id"]);
    assert_eq!(patient["gender"], "female");
    assert_eq!(patient["date_of_birth"], "1990-12-31");
    Ok(())
}

#[tokio::test]
async fn listing_only_shows_own_patients() -> Result<()> {
    let (app, _) = common::test_app();
    let (_, token_a) = common::register(&app, "Ada", "ada@clinic.example").await?;
    let (_, token_b) = common::register(&app, "Bob", "bob@clinic.example").await?;
    common::create_patient(&app, &token_a, "Jo").await?;

    let (status, list_a) =
        common::request(&app, Method::GET, "/patients", Some(&token_a), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list_a.as_array().unwrap().len(), 1);

    let (status, list_b) =
        common::request(&app, Method::GET, "/patients", Some(&token_b), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(list_b.as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn foreign_patient_is_indistinguishable_from_missing() -> Result<()> {
    let (app, _) = common::test_app();
    let (_, token_a) = common::register(&app, "Ada", "ada@clinic.example").await?;
    let (_, token_b) = common::register(&app, "Bob", "bob@clinic.example").await?;
    let patient_id = common::create_patient(&app, &token_a, "Jo").await?;

    let foreign_path = format!("/patients/{}", patient_id);
    let missing_path = format!("/patients/{}", uuid_like());

    for method in [Method::GET, Method::PUT, Method::DELETE] {
        let body = (method == Method::PUT).then(|| json!({}));
        let (foreign_status, foreign_body) = common::request_raw(
            &app,
            method.clone(),
            &foreign_path,
            Some(&token_b),
            body.clone(),
        )
        .await?;
        let (missing_status, missing_body) =
            common::request_raw(&app, method.clone(), &missing_path, Some(&token_b), body).await?;

        assert_eq!(foreign_status, StatusCode::NOT_FOUND, "{}", method);
        assert_eq!(missing_status, StatusCode::NOT_FOUND, "{}", method);
        assert_eq!(foreign_body, missing_body, "{}", method);
    }

    // The record is untouched for its owner
    let (status, _) =
        common::request(&app, Method::GET, &foreign_path, Some(&token_a), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn update_is_partial_and_delete_is_permanent() -> Result<()> {
    let (app, _) = common::test_app();
    let (_, token) = common::register(&app, "Ada", "ada@clinic.example").await?;
    let patient_id = common::create_patient(&app, &token, "Jo").await?;
    let path = format!("/patients/{}", patient_id);

    let (status, updated) = common::request(
        &app,
        Method::PUT,
        &path,
        Some(&token),
        Some(json!({ "phone": "555-0100" })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Jo");
    assert_eq!(updated["phone"], "555-0100");

    let (status, body) = common::request(&app, Method::DELETE, &path, Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Patient removed" }));

    let (status, _) = common::request(&app, Method::GET, &path, Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_without_required_fields_lists_them() -> Result<()> {
    let (app, _) = common::test_app();
    let (_, token) = common::register(&app, "Ada", "ada@clinic.example").await?;

    let (status, body) = common::request(
        &app,
        Method::POST,
        "/patients",
        Some(&token),
        Some(json!({ "phone": "555-0100" })),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_object().expect("errors map");
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("gender"));
    Ok(())
}

fn uuid_like() -> String {
    // A valid v4 uuid that is not in the store
    "7b1a2f3c-4d5e-4f60-8a9b-0c1d2e3f4a5b".to_string()
}
