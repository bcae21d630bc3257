//! Generic CRUD handlers, mounted once at /api/:resource[/: id]. The path
//! segment resolves a `ResourceDef`; everything else is shared machinery.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::resource::descriptor::ResourceDef;
use crate::resource::query::{build_list_query, parse_pagination};
use crate::resource::registry;
use crate::resource::validate::{validate_create, validate_update};
use crate::state::AppState;

fn resolve(resource: &str) -> Result<&'static ResourceDef, ApiError> {
    registry::lookup(resource)
        .ok_or_else(|| ApiError::not_found(format!("Unknown resource: {}", resource)))
}

/// Record ids are UUIDs; anything else cannot match a row.
fn parse_id(def: &ResourceDef, id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id)
        .map_err(|_| ApiError::not_found(format!("{} record not found", def.name)))
}

fn not_found(def: &ResourceDef) -> ApiError {
    ApiError::not_found(format!("{} record not found", def.name))
}

/// GET /api/:resource - paginated list with search and field filters.
///
/// The total is computed with the same predicate as the page (filtered
/// total). The two queries are not a snapshot; a concurrent write can make
/// them mutually inconsistent, which is acceptable for dashboard listings.
pub async fn list(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let def = resolve(&resource)?;
    let pagination = parse_pagination(&params)?;
    let query = build_list_query(def, &params, pagination)?;

    let rows = state.gateway.select(def, &query).await?;
    let total = state.gateway.count(def, &query).await?;

    Ok(Json(json!({
        def.list_key: rows,
        "total": total,
        "page": pagination.page,
        "limit": pagination.limit,
    })))
}

/// GET /api/:resource/:id - bare record or 404.
pub async fn get(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let def = resolve(&resource)?;
    let id = parse_id(def, &id)?;

    let row = state
        .gateway
        .get(def, id)
        .await?
        .ok_or_else(|| not_found(def))?;
    Ok(Json(row))
}

/// POST /api/:resource - validate, assign id/timestamps, insert, 201.
pub async fn create(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let def = resolve(&resource)?;
    let mut row = validate_create(def, &payload)?;

    let now = Utc::now().to_rfc3339();
    row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    row.insert("created_at".to_string(), Value::String(now.clone()));
    row.insert("updated_at".to_string(), Value::String(now));

    let stored = state.gateway.insert(def, row).await?;
    tracing::debug!(resource = def.name, "created record");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// PUT /api/:resource/:id - partial update; only supplied fields change and
/// updated_at is always bumped. Status changes go through the transition
/// table against the current row.
pub async fn update(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let def = resolve(&resource)?;
    let id = parse_id(def, &id)?;

    let current = state
        .gateway
        .get(def, id)
        .await?
        .ok_or_else(|| not_found(def))?;

    let mut changes: Map<String, Value> = validate_update(def, &payload, &current)?;
    changes.insert(
        "updated_at".to_string(),
        Value::String(Utc::now().to_rfc3339()),
    );

    let updated = state
        .gateway
        .update(def, id, changes)
        .await?
        .ok_or_else(|| not_found(def))?;
    Ok(Json(updated))
}

/// DELETE /api/:resource/:id - hard delete, 404 when absent, no cascade.
pub async fn delete(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let def = resolve(&resource)?;
    let id = parse_id(def, &id)?;

    if !state.gateway.delete(def, id).await? {
        return Err(not_found(def));
    }
    tracing::debug!(resource = def.name, %id, "deleted record");
    Ok(Json(json!({ "deleted": true })))
}
