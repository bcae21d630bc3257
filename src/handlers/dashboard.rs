//! Read-only dashboard aggregation. Every call re-scans the relevant
//! tables through the gateway; at single-clinic volumes that is fine.

use axum::{extract::State, response::Json};
use chrono::{DateTime, Datelike, FixedOffset};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::ApiError;
use crate::resource::descriptor::FieldKind;
use crate::resource::query::{ListQuery, SortDirection};
use crate::resource::registry;
use crate::state::AppState;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let everything = ListQuery::default();
    let pending = ListQuery::filter_eq("status", "pending", FieldKind::Status);
    let paid = ListQuery::filter_eq("status", "paid", FieldKind::Status);

    let total_doctors = state.gateway.count(&registry::DOCTORS, &everything).await?;
    let total_patients = state.gateway.count(&registry::PATIENTS, &everything).await?;
    let total_appointments = state
        .gateway
        .count(&registry::APPOINTMENTS, &everything)
        .await?;
    let pending_appointments = state
        .gateway
        .count(&registry::APPOINTMENTS, &pending)
        .await?;
    let total_revenue = state
        .gateway
        .sum(&registry::INVOICES, "amount", &paid)
        .await?;

    Ok(Json(json!({
        "total_doctors": total_doctors,
        "total_patients": total_patients,
        "total_appointments": total_appointments,
        "pending_appointments": pending_appointments,
        "total_revenue": total_revenue,
    })))
}

/// GET /api/dashboard/recent-appointments - latest 10 by appointment date,
/// with doctor and patient names resolved for display.
pub async fn recent_appointments(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let query = ListQuery {
        order: Some(("date", SortDirection::Desc)),
        limit: Some(10),
        ..ListQuery::default()
    };
    let appointments = state.gateway.select(&registry::APPOINTMENTS, &query).await?;

    let mut enriched = Vec::with_capacity(appointments.len());
    for appointment in appointments {
        let doctor = linked_name(&state, &registry::DOCTORS, appointment.get("doctor_id")).await?;
        let patient = linked_name(&state, &registry::PATIENTS, appointment.get("patient_id")).await?;
        enriched.push(json!({
            "id": appointment.get("id").cloned().unwrap_or(Value::Null),
            "date": appointment.get("date").cloned().unwrap_or(Value::Null),
            "status": appointment.get("status").cloned().unwrap_or(Value::Null),
            "notes": appointment.get("notes").cloned().unwrap_or(Value::Null),
            "doctor": doctor,
            "patient": patient,
        }));
    }

    Ok(Json(Value::Array(enriched)))
}

async fn linked_name(
    state: &AppState,
    def: &'static crate::resource::descriptor::ResourceDef,
    id: Option<&Value>,
) -> Result<Value, ApiError> {
    let Some(id) = id.and_then(Value::as_str).and_then(|s| Uuid::parse_str(s).ok()) else {
        return Ok(Value::Null);
    };
    let row = state.gateway.get(def, id).await?;
    Ok(match row.as_ref().and_then(|r| r.get("name")) {
        Some(name) => json!({ "name": name }),
        None => Value::Null,
    })
}

/// GET /api/dashboard/revenue-chart - invoice amounts bucketed by creation
/// month, chronological.
pub async fn revenue_chart(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let invoices = state
        .gateway
        .select(&registry::INVOICES, &ListQuery::default())
        .await?;
    Ok(Json(monthly_series(&invoices, |row| {
        row.get("amount").and_then(Value::as_f64).unwrap_or(0.0)
    })))
}

/// GET /api/dashboard/patient-growth - new patients per month.
pub async fn patient_growth(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let patients = state
        .gateway
        .select(&registry::PATIENTS, &ListQuery::default())
        .await?;
    Ok(Json(monthly_series(&patients, |_| 1.0)))
}

/// Reduce rows into an ordered `[{name, value}]` series keyed by the
/// creation month. Rows without a parseable created_at are skipped.
fn monthly_series(rows: &[Value], weight: impl Fn(&Value) -> f64) -> Value {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for row in rows {
        let Some(created) = row
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::<FixedOffset>::parse_from_rfc3339(s).ok())
        else {
            continue;
        };
        *buckets
            .entry((created.year(), created.month0()))
            .or_insert(0.0) += weight(row);
    }

    Value::Array(
        buckets
            .into_iter()
            .map(|((_, month0), value)| json!({ "name": MONTHS[month0 as usize], "value": value }))
            .collect(),
    )
}
