mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use serde_json::{json, Value};

async fn seed_patients(app: &axum::Router, token: &str, n: usize) {
    for i in 0..n {
        let (status, _) = common::request(
            app,
            "POST",
            "/api/patients",
            Some(token),
            Some(json!({
                "name": format!("Patient {:02}", i),
                "gender": if i % 2 == 0 { "female" } else { "male" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

fn ids(body: &Value) -> HashSet<String> {
    body["patients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn pages_are_disjoint_and_cover_the_collection() {
    let app = common::test_app();
    let token = common::auth_token();
    seed_patients(&app, &token, 7).await;

    let (status, page1) =
        common::request(&app, "GET", "/api/patients?page=1&limit=4", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page1["total"], 7);
    assert_eq!(page1["page"], 1);
    assert_eq!(page1["limit"], 4);
    assert_eq!(page1["patients"].as_array().unwrap().len(), 4);

    let (_, page2) =
        common::request(&app, "GET", "/api/patients?page=2&limit=4", Some(&token), None).await;
    assert_eq!(page2["patients"].as_array().unwrap().len(), 3);

    let first = ids(&page1);
    let second = ids(&page2);
    assert!(first.is_disjoint(&second));

    let (_, all) =
        common::request(&app, "GET", "/api/patients?limit=50", Some(&token), None).await;
    let everything = ids(&all);
    assert_eq!(everything.len(), 7);
    assert_eq!(
        first.union(&second).cloned().collect::<HashSet<_>>(),
        everything
    );
}

#[tokio::test]
async fn total_reflects_the_filtered_set() {
    let app = common::test_app();
    let token = common::auth_token();
    seed_patients(&app, &token, 6).await;

    let (status, body) = common::request(
        &app,
        "GET",
        "/api/patients?gender=female&limit=2",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // 0,2,4 are female; total counts all matches, not just the page
    assert_eq!(body["total"], 3);
    assert_eq!(body["patients"].as_array().unwrap().len(), 2);
    for row in body["patients"].as_array().unwrap() {
        assert_eq!(row["gender"], "female");
    }
}

#[tokio::test]
async fn search_spans_the_searchable_columns() {
    let app = common::test_app();
    let token = common::auth_token();

    for (name, email) in [
        ("Alice Hart", "alice@x.com"),
        ("Bob Stone", "bob@x.com"),
        ("Carol Hartley", "carol@x.com"),
    ] {
        common::request(
            &app,
            "POST",
            "/api/patients",
            Some(&token),
            Some(json!({ "name": name, "email": email })),
        )
        .await;
    }

    let (_, body) =
        common::request(&app, "GET", "/api/patients?search=hart", Some(&token), None).await;
    assert_eq!(body["total"], 2);

    // Search also matches the email column
    let (_, body) =
        common::request(&app, "GET", "/api/patients?search=bob@", Some(&token), None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["patients"][0]["name"], "Bob Stone");
}

#[tokio::test]
async fn listing_is_newest_first() {
    let app = common::test_app();
    let token = common::auth_token();
    seed_patients(&app, &token, 3).await;

    let (_, body) = common::request(&app, "GET", "/api/patients", Some(&token), None).await;
    let stamps: Vec<&str> = body["patients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["created_at"].as_str().unwrap())
        .collect();
    let mut sorted = stamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(stamps, sorted);
}

#[tokio::test]
async fn junk_paging_parameters_are_rejected() {
    let app = common::test_app();
    let token = common::auth_token();

    for uri in [
        "/api/patients?page=zero",
        "/api/patients?limit=-1",
        "/api/patients?page=0",
        // A page this far out would overflow the skip arithmetic
        "/api/patients?page=9223372036854775807&limit=1000",
    ] {
        let (status, body) = common::request(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"], true);
    }
}

#[tokio::test]
async fn typed_filter_values_are_rejected_with_400() {
    let app = common::test_app();
    let token = common::auth_token();

    // date is a declared date filter on attendance
    let (status, body) =
        common::request(&app, "GET", "/api/attendance?date=junk", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = common::request(
        &app,
        "GET",
        "/api/attendance?date=2026-05-01",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn list_keys_follow_the_resource() {
    let app = common::test_app();
    let token = common::auth_token();

    let (_, body) =
        common::request(&app, "GET", "/api/emergency-calls", Some(&token), None).await;
    assert!(body["calls"].as_array().is_some());

    let (_, body) =
        common::request(&app, "GET", "/api/room-allotments", Some(&token), None).await;
    assert!(body["allotments"].as_array().is_some());
}
