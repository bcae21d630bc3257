mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn guarded_routes_reject_requests_without_a_token() {
    let app = common::test_app();

    let (status, body) = common::request(&app, "GET", "/api/patients?page=1&limit=10", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    // No patient list leaks through the guard
    assert!(body.get("patients").is_none());
}

#[tokio::test]
async fn guarded_routes_reject_garbage_and_malformed_tokens() {
    let app = common::test_app();

    let (status, _) = common::request(&app, "GET", "/api/doctors", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = common::request(
        &app,
        "POST",
        "/api/doctors",
        None,
        Some(json!({ "name": "Dr. Intruder", "email": "i@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);

    // The rejected create left no record behind
    let token = common::auth_token();
    let (_, body) = common::request(&app, "GET", "/api/doctors", Some(&token), None).await;
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn public_routes_need_no_token() {
    let app = common::test_app();

    let (status, body) = common::request(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["resources"].as_array().unwrap().iter().any(|r| r == "doctors"));

    let (status, body) = common::request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn register_login_and_profile_flow() {
    let app = common::test_app();

    let (status, body) = common::request(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": "Nurse Joy", "email": "joy@clinic.test", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["role"], "doctor");
    assert!(body["user"].get("password").is_none());

    // Duplicate email is a conflict
    let (status, _) = common::request(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": "Imposter", "email": "joy@clinic.test", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Wrong password and unknown email fail identically
    let (status, _) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "joy@clinic.test", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "joy@clinic.test", "password": "hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = common::request(&app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Nurse Joy");
    assert!(body.get("password").is_none() || body["password"].is_null());

    let (status, body) = common::request(
        &app,
        "PUT",
        "/api/auth/profile",
        Some(&token),
        Some(json!({ "name": "Nurse Joy, RN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Nurse Joy, RN");
    assert_eq!(body["email"], "joy@clinic.test");
}

#[tokio::test]
async fn change_password_requires_the_old_one() {
    let app = common::test_app();

    let (_, body) = common::request(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": "A", "email": "a@clinic.test", "password": "old-pass" })),
    )
    .await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, _) = common::request(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(json!({ "old_password": "nope", "new_password": "new-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = common::request(
        &app,
        "POST",
        "/api/auth/change-password",
        Some(&token),
        Some(json!({ "old_password": "old-pass", "new_password": "new-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = common::request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "a@clinic.test", "password": "new-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
