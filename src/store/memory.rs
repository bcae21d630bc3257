//! In-memory gateway used by the test suites. Same observable semantics as
//! the Postgres gateway: case-insensitive substring search, exact-match
//! filters, newest-first ordering, offset pagination, filtered totals.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::resource::descriptor::ResourceDef;
use crate::resource::query::{ListQuery, SortDirection};
use crate::store::{PersistenceGateway, StoreError};

#[derive(Default)]
pub struct MemoryGateway {
    tables: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, query: &ListQuery) -> bool {
    for filter in &query.filters {
        let Some(field) = row.get(filter.column) else { return false };
        if field.is_null() || value_text(field) != filter.value {
            return false;
        }
    }

    if let Some(term) = &query.search {
        let needle = term.to_lowercase();
        let hit = query.search_columns.iter().any(|column| {
            row.get(*column)
                .and_then(Value::as_str)
                .map(|s| s.to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
        if !hit {
            return false;
        }
    }

    true
}

/// Sort and page rows exactly the way the SQL gateway would. RFC 3339
/// timestamps compare correctly as strings.
fn apply_order_and_page(mut rows: Vec<Value>, query: &ListQuery) -> Vec<Value> {
    if let Some((column, direction)) = &query.order {
        rows.sort_by(|a, b| {
            let ka = a.get(*column).map(value_text).unwrap_or_default();
            let kb = b.get(*column).map(value_text).unwrap_or_default();
            match direction {
                SortDirection::Asc => ka.cmp(&kb),
                SortDirection::Desc => kb.cmp(&ka),
            }
        });
    }

    let offset = query.offset.unwrap_or(0).max(0) as usize;
    let rows = rows.into_iter().skip(offset);
    match query.limit {
        Some(limit) => rows.take(limit.max(0) as usize).collect(),
        None => rows.collect(),
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn select(&self, def: &ResourceDef, query: &ListQuery) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables
            .get(def.table)
            .map(|rows| rows.iter().filter(|r| matches(r, query)).cloned().collect())
            .unwrap_or_default();
        Ok(apply_order_and_page(rows, query))
    }

    async fn count(&self, def: &ResourceDef, query: &ListQuery) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(def.table)
            .map(|rows| rows.iter().filter(|r| matches(r, query)).count() as i64)
            .unwrap_or(0))
    }

    async fn get(&self, def: &ResourceDef, id: Uuid) -> Result<Option<Value>, StoreError> {
        let id = id.to_string();
        let tables = self.tables.read().await;
        Ok(tables.get(def.table).and_then(|rows| {
            rows.iter()
                .find(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
                .cloned()
        }))
    }

    async fn insert(&self, def: &ResourceDef, row: Map<String, Value>) -> Result<Value, StoreError> {
        let mut tables = self.tables.write().await;
        let stored = Value::Object(row);
        tables
            .entry(def.table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        def: &ResourceDef,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> Result<Option<Value>, StoreError> {
        let id = id.to_string();
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(def.table) else { return Ok(None) };
        let Some(row) = rows
            .iter_mut()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(id.as_str()))
        else {
            return Ok(None);
        };
        if let Some(object) = row.as_object_mut() {
            for (column, value) in changes {
                object.insert(column, value);
            }
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, def: &ResourceDef, id: Uuid) -> Result<bool, StoreError> {
        let id = id.to_string();
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(def.table) else { return Ok(false) };
        let before = rows.len();
        rows.retain(|r| r.get("id").and_then(Value::as_str) != Some(id.as_str()));
        Ok(rows.len() < before)
    }

    async fn sum(
        &self,
        def: &ResourceDef,
        column: &str,
        query: &ListQuery,
    ) -> Result<f64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(def.table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| matches(r, query))
                    .filter_map(|r| r.get(column).and_then(Value::as_f64))
                    .sum()
            })
            .unwrap_or(0.0))
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::descriptor::FieldKind;
    use crate::resource::query::EqFilter;
    use crate::resource::registry;
    use serde_json::json;

    fn doctor(id: &str, name: &str, created_at: &str) -> Map<String, Value> {
        json!({
            "id": id,
            "name": name,
            "email": format!("{}@clinic.test", name),
            "specialization": "Cardiology",
            "created_at": created_at,
            "updated_at": created_at,
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn orders_newest_first_and_paginates() {
        let store = MemoryGateway::new();
        for (i, ts) in ["2026-01-01T00:00:00+00:00", "2026-02-01T00:00:00+00:00", "2026-03-01T00:00:00+00:00"]
            .iter()
            .enumerate()
        {
            store
                .insert(&registry::DOCTORS, doctor(&Uuid::new_v4().to_string(), &format!("d{}", i), ts))
                .await
                .unwrap();
        }

        let query = ListQuery {
            order: Some(("created_at", SortDirection::Desc)),
            limit: Some(2),
            offset: Some(0),
            ..ListQuery::default()
        };
        let page = store.select(&registry::DOCTORS, &query).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["name"], "d2");
        assert_eq!(page[1]["name"], "d1");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = MemoryGateway::new();
        store
            .insert(&registry::DOCTORS, doctor(&Uuid::new_v4().to_string(), "Amelia", "2026-01-01T00:00:00+00:00"))
            .await
            .unwrap();

        let query = ListQuery {
            search: Some("MEL".to_string()),
            search_columns: vec!["name", "email"],
            ..ListQuery::default()
        };
        assert_eq!(store.count(&registry::DOCTORS, &query).await.unwrap(), 1);

        let query = ListQuery {
            search: Some("zzz".to_string()),
            search_columns: vec!["name", "email"],
            ..ListQuery::default()
        };
        assert_eq!(store.count(&registry::DOCTORS, &query).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn filters_and_sum_share_the_predicate() {
        let store = MemoryGateway::new();
        for (amount, status) in [(100.0, "paid"), (50.0, "paid"), (70.0, "pending")] {
            store
                .insert(
                    &registry::INVOICES,
                    json!({
                        "id": Uuid::new_v4().to_string(),
                        "patient_id": Uuid::new_v4().to_string(),
                        "amount": amount,
                        "status": status,
                        "created_at": "2026-01-01T00:00:00+00:00",
                        "updated_at": "2026-01-01T00:00:00+00:00",
                    })
                    .as_object()
                    .cloned()
                    .unwrap(),
                )
                .await
                .unwrap();
        }

        let paid = ListQuery {
            filters: vec![EqFilter {
                column: "status",
                value: "paid".to_string(),
                kind: FieldKind::Status,
            }],
            ..ListQuery::default()
        };
        assert_eq!(store.count(&registry::INVOICES, &paid).await.unwrap(), 2);
        assert_eq!(store.sum(&registry::INVOICES, "amount", &paid).await.unwrap(), 150.0);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_matched() {
        let store = MemoryGateway::new();
        let id = Uuid::new_v4();
        store
            .insert(&registry::DOCTORS, doctor(&id.to_string(), "gone", "2026-01-01T00:00:00+00:00"))
            .await
            .unwrap();

        assert!(store.delete(&registry::DOCTORS, id).await.unwrap());
        assert!(!store.delete(&registry::DOCTORS, id).await.unwrap());
        assert!(store.get(&registry::DOCTORS, id).await.unwrap().is_none());
    }
}
