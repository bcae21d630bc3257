use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use clinic_api::auth::{generate_token, Claims};
use clinic_api::state::AppState;
use clinic_api::store::MemoryGateway;

/// Application wired to a fresh in-memory gateway.
pub fn test_app() -> Router {
    clinic_api::app(AppState::new(Arc::new(MemoryGateway::new())))
}

/// A valid bearer token for an arbitrary staff identity.
pub fn auth_token() -> String {
    let claims = Claims::new(
        Uuid::new_v4(),
        "staff@clinic.test".to_string(),
        "admin".to_string(),
    );
    generate_token(&claims).expect("token generation")
}

/// Drive one request through the router and decode the JSON response.
pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request build");

    let response = app.clone().oneshot(request).await.expect("router call");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
