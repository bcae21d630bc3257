//! Staff account endpoints: register, login, profile, change-password.
//! Users live in their own table and are never exposed through the generic
//! resource router; password hashes never leave this module.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::auth::{generate_token, hash_password, verify_password, Claims};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::resource::descriptor::FieldKind;
use crate::resource::query::ListQuery;
use crate::resource::registry;
use crate::state::AppState;

const DEFAULT_ROLE: &str = "doctor";

/// Public view of a user row: everything except the password hash.
fn public_user(row: &Value) -> Value {
    json!({
        "id": row.get("id").cloned().unwrap_or(Value::Null),
        "name": row.get("name").cloned().unwrap_or(Value::Null),
        "email": row.get("email").cloned().unwrap_or(Value::Null),
        "role": row.get("role").cloned().unwrap_or(Value::Null),
        "avatar": row.get("avatar").cloned().unwrap_or(Value::Null),
    })
}

fn require_str<'a>(payload: &'a Value, field: &str) -> Result<&'a str, ApiError> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{} is required", field)))
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<Value>, ApiError> {
    let query = ListQuery {
        limit: Some(1),
        ..ListQuery::filter_eq("email", email, FieldKind::Text)
    };
    let mut rows = state.gateway.select(&registry::USERS, &query).await?;
    Ok(rows.pop())
}

fn issue_token(row: &Value) -> Result<String, ApiError> {
    let id = row
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| ApiError::internal("Stored user record is malformed"))?;
    let email = row.get("email").and_then(Value::as_str).unwrap_or_default();
    let role = row
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ROLE);

    let claims = Claims::new(id, email.to_string(), role.to_string());
    Ok(generate_token(&claims)?)
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let name = require_str(&payload, "name")?;
    let email = require_str(&payload, "email")?;
    let password = require_str(&payload, "password")?;
    let role = payload
        .get("role")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_ROLE);

    if find_by_email(&state, email).await?.is_some() {
        return Err(ApiError::conflict("Email already exists"));
    }

    let now = Utc::now().to_rfc3339();
    let mut row = Map::new();
    row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    row.insert("name".to_string(), Value::String(name.to_string()));
    row.insert("email".to_string(), Value::String(email.to_string()));
    row.insert("password".to_string(), Value::String(hash_password(password)?));
    row.insert("role".to_string(), Value::String(role.to_string()));
    row.insert("created_at".to_string(), Value::String(now.clone()));
    row.insert("updated_at".to_string(), Value::String(now));

    let stored = state.gateway.insert(&registry::USERS, row).await?;
    let token = issue_token(&stored)?;

    tracing::info!(email, "registered staff account");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "token": token, "user": public_user(&stored) })),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let email = require_str(&payload, "email")?;
    let password = require_str(&payload, "password")?;

    // Unknown email and bad password fail identically
    let user = find_by_email(&state, email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let hash = user.get("password").and_then(Value::as_str).unwrap_or("");
    if !verify_password(password, hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = issue_token(&user)?;
    Ok(Json(json!({ "token": token, "user": public_user(&user) })))
}

/// GET /api/auth/profile
pub async fn profile_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .gateway
        .get(&registry::USERS, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(public_user(&user)))
}

/// PUT /api/auth/profile - name and avatar only.
pub async fn profile_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let mut changes = Map::new();
    if let Some(name) = payload.get("name") {
        let name = name
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::validation("name must be a non-empty string"))?;
        changes.insert("name".to_string(), Value::String(name.to_string()));
    }
    if let Some(avatar) = payload.get("avatar") {
        match avatar {
            Value::Null => {
                changes.insert("avatar".to_string(), Value::Null);
            }
            Value::String(s) => {
                changes.insert("avatar".to_string(), Value::String(s.clone()));
            }
            _ => return Err(ApiError::validation("avatar must be a string")),
        }
    }
    if changes.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }
    changes.insert("updated_at".to_string(), Value::String(Utc::now().to_rfc3339()));

    let updated = state
        .gateway
        .update(&registry::USERS, auth.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(public_user(&updated)))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let old_password = require_str(&payload, "old_password")?;
    let new_password = require_str(&payload, "new_password")?;

    let user = state
        .gateway
        .get(&registry::USERS, auth.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let hash = user.get("password").and_then(Value::as_str).unwrap_or("");
    if !verify_password(old_password, hash) {
        return Err(ApiError::validation("Incorrect old password"));
    }

    let mut changes = Map::new();
    changes.insert("password".to_string(), Value::String(hash_password(new_password)?));
    changes.insert("updated_at".to_string(), Value::String(Utc::now().to_rfc3339()));

    state
        .gateway
        .update(&registry::USERS, auth.id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    tracing::info!(user = %auth.id, "password changed");
    Ok(Json(json!({ "message": "Password changed successfully" })))
}
