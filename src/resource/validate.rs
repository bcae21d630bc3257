//! Payload validation for create and update.
//!
//! Every incoming field is checked against its declared kind before anything
//! reaches the store - a non-numeric value for a numeric field is rejected
//! here rather than written through as garbage. Unknown fields are dropped.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::resource::descriptor::{FieldDef, FieldKind, ResourceDef};

/// Validate a create payload and return the normalized column map
/// (status defaulted; id and timestamps are assigned by the caller).
pub fn validate_create(def: &ResourceDef, payload: &Value) -> Result<Map<String, Value>, ApiError> {
    let body = as_object(payload)?;
    let mut row = Map::new();
    let mut field_errors = HashMap::new();

    for field in def.fields {
        match body.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    field_errors.insert(field.name.to_string(), "This field is required".to_string());
                } else if body.contains_key(field.name) {
                    row.insert(field.name.to_string(), Value::Null);
                }
            }
            Some(value) => match check_value(def, field, value) {
                Ok(normalized) => {
                    row.insert(field.name.to_string(), normalized);
                }
                Err(msg) => {
                    field_errors.insert(field.name.to_string(), msg);
                }
            },
        }
    }

    if !field_errors.is_empty() {
        return Err(ApiError::validation_fields("Invalid request body", field_errors));
    }

    // Default the status when the resource carries a machine and none was sent
    if let Some(status) = &def.status {
        row.entry("status".to_string())
            .or_insert_with(|| Value::String(status.default.to_string()));
    }

    Ok(row)
}

/// Validate a partial update against the current row. Only supplied fields
/// are returned; a status change must follow the resource's transition
/// table. An effectively empty payload is an error, matching list handlers'
/// "No fields to update" behavior.
pub fn validate_update(
    def: &ResourceDef,
    payload: &Value,
    current: &Value,
) -> Result<Map<String, Value>, ApiError> {
    let body = as_object(payload)?;
    let mut changes = Map::new();
    let mut field_errors = HashMap::new();

    for field in def.fields {
        let Some(value) = body.get(field.name) else { continue };

        if value.is_null() {
            if field.required {
                field_errors.insert(field.name.to_string(), "This field cannot be cleared".to_string());
            } else {
                changes.insert(field.name.to_string(), Value::Null);
            }
            continue;
        }

        match check_value(def, field, value) {
            Ok(normalized) => {
                changes.insert(field.name.to_string(), normalized);
            }
            Err(msg) => {
                field_errors.insert(field.name.to_string(), msg);
            }
        }
    }

    if !field_errors.is_empty() {
        return Err(ApiError::validation_fields("Invalid request body", field_errors));
    }

    if changes.is_empty() {
        return Err(ApiError::validation("No fields to update"));
    }

    if let (Some(machine), Some(Value::String(next))) = (&def.status, changes.get("status")) {
        let from = current
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or(machine.default);
        if !machine.can_transition(from, next) {
            return Err(ApiError::validation(format!(
                "Illegal status transition: {} -> {}",
                from, next
            )));
        }
    }

    Ok(changes)
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ApiError> {
    payload
        .as_object()
        .ok_or_else(|| ApiError::validation("Request body must be a JSON object"))
}

/// Check a single non-null value against its field kind, returning the
/// normalized JSON representation stored by the gateways.
fn check_value(def: &ResourceDef, field: &FieldDef, value: &Value) -> Result<Value, String> {
    match field.kind {
        FieldKind::Text => value
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| "Must be a string".to_string()),
        FieldKind::Integer => value
            .as_i64()
            .map(Value::from)
            .ok_or_else(|| "Must be an integer".to_string()),
        FieldKind::Float => value
            .as_f64()
            .map(Value::from)
            .ok_or_else(|| "Must be a number".to_string()),
        FieldKind::Bool => value
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| "Must be a boolean".to_string()),
        FieldKind::Uuid => value
            .as_str()
            .and_then(|s| uuid::Uuid::parse_str(s).ok())
            .map(|u| Value::String(u.to_string()))
            .ok_or_else(|| "Must be a UUID".to_string()),
        FieldKind::Date => value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .map(|d| Value::String(d.to_string()))
            .ok_or_else(|| "Must be a date (YYYY-MM-DD)".to_string()),
        FieldKind::DateTime => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| Value::String(dt.to_rfc3339()))
            .ok_or_else(|| "Must be an RFC 3339 timestamp".to_string()),
        FieldKind::Status => {
            let s = value.as_str().ok_or_else(|| "Must be a string".to_string())?;
            match &def.status {
                Some(machine) if machine.allows(s) => Ok(Value::String(s.to_string())),
                Some(machine) => Err(format!(
                    "Must be one of: {}",
                    machine.values.join(", ")
                )),
                None => Ok(Value::String(s.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::registry;
    use serde_json::json;

    #[test]
    fn create_requires_declared_fields() {
        let err = validate_create(&registry::DOCTORS, &json!({ "name": "Dr. A" })).unwrap_err();
        match err {
            ApiError::Validation { field_errors: Some(fields), .. } => {
                assert!(fields.contains_key("email"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_rejects_non_numeric_numbers() {
        let err = validate_create(
            &registry::DOCTORS,
            &json!({ "name": "Dr. A", "email": "a@x.com", "experience": "five" }),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn create_drops_unknown_fields_and_defaults_status() {
        let row = validate_create(
            &registry::APPOINTMENTS,
            &json!({
                "doctor_id": "6dfdd59c-6d40-4016-add2-10ca9ee05f30",
                "patient_id": "8b79e0f4-9a4c-4e76-9a7e-0a3a08e3b3bb",
                "date": "2026-09-01T10:00:00Z",
                "shoe_size": 42
            }),
        )
        .unwrap();
        assert_eq!(row["status"], "pending");
        assert!(!row.contains_key("shoe_size"));
    }

    #[test]
    fn create_rejects_status_outside_value_set() {
        let err = validate_create(
            &registry::APPOINTMENTS,
            &json!({
                "doctor_id": "6dfdd59c-6d40-4016-add2-10ca9ee05f30",
                "patient_id": "8b79e0f4-9a4c-4e76-9a7e-0a3a08e3b3bb",
                "date": "2026-09-01T10:00:00Z",
                "status": "teleported"
            }),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    #[test]
    fn update_rejects_illegal_transition() {
        let current = json!({ "status": "completed" });
        let err = validate_update(&registry::APPOINTMENTS, &json!({ "status": "pending" }), &current)
            .unwrap_err();
        assert!(err.message().contains("Illegal status transition"));
    }

    #[test]
    fn update_allows_legal_transition_and_partial_fields() {
        let current = json!({ "status": "pending" });
        let changes =
            validate_update(&registry::APPOINTMENTS, &json!({ "status": "confirmed" }), &current)
                .unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["status"], "confirmed");
    }

    #[test]
    fn update_with_no_known_fields_is_an_error() {
        let current = json!({ "status": "pending" });
        let err = validate_update(&registry::APPOINTMENTS, &json!({ "bogus": 1 }), &current)
            .unwrap_err();
        assert_eq!(err.message(), "No fields to update");
    }

    #[test]
    fn update_can_clear_optional_fields_but_not_required_ones() {
        let current = json!({ "status": "pending" });
        let changes =
            validate_update(&registry::APPOINTMENTS, &json!({ "notes": null }), &current).unwrap();
        assert_eq!(changes["notes"], Value::Null);

        let err = validate_update(&registry::APPOINTMENTS, &json!({ "date": null }), &current)
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }
}
