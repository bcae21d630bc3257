//! Postgres gateway: parameterized SQL generated from resource definitions,
//! rows read and written as JSON via `to_jsonb`.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::config;
use crate::resource::descriptor::{FieldKind, ResourceDef};
use crate::resource::query::ListQuery;
use crate::store::{PersistenceGateway, StoreError};

pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a pool from DATABASE_URL using the configured limits.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let db = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(db.acquire_timeout_secs))
            .connect(database_url)
            .await
            .map_err(map_sqlx)?;
        Ok(Self::new(pool))
    }
}

/// Parameter cast appended to each placeholder so text binds coerce to the
/// column's type.
fn cast_for(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text | FieldKind::Status => "",
        FieldKind::Integer => "::bigint",
        FieldKind::Float => "::double precision",
        FieldKind::Bool => "::boolean",
        FieldKind::Uuid => "::uuid",
        FieldKind::Date => "::date",
        FieldKind::DateTime => "::timestamptz",
    }
}

/// Validate and quote a SQL identifier. Identifiers only ever come from the
/// static registry, but the store refuses anything else on principle.
fn quote_ident(name: &str) -> Result<String, StoreError> {
    let mut chars = name.chars();
    let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !head_ok || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

/// Cast for a column outside the declared field set (id, created_at,
/// updated_at are server-assigned and not listed in `ResourceDef::fields`).
fn column_cast(def: &ResourceDef, column: &str) -> &'static str {
    match column {
        "id" => "::uuid",
        "created_at" | "updated_at" => "::timestamptz",
        _ => def.field(column).map(|f| cast_for(f.kind)).unwrap_or(""),
    }
}

/// Search terms are literal substrings; `%`, `_` and `\` in the term must
/// not act as ILIKE pattern syntax.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// WHERE clause from a `ListQuery`; returns the SQL fragment (without the
/// WHERE keyword) and the text parameters to bind, starting at `$1`.
fn where_clause(query: &ListQuery) -> Result<(String, Vec<String>), StoreError> {
    let mut conditions = Vec::new();
    let mut params: Vec<String> = Vec::new();

    for filter in &query.filters {
        let column = quote_ident(filter.column)?;
        params.push(filter.value.clone());
        conditions.push(format!(
            "t.{} = ${}{}",
            column,
            params.len(),
            cast_for(filter.kind)
        ));
    }

    if let Some(term) = &query.search {
        if !query.search_columns.is_empty() {
            params.push(format!("%{}%", escape_like(term)));
            let n = params.len();
            let ors: Result<Vec<String>, StoreError> = query
                .search_columns
                .iter()
                .map(|col| Ok(format!("t.{}::text ILIKE ${}", quote_ident(col)?, n)))
                .collect();
            conditions.push(format!("({})", ors?.join(" OR ")));
        }
    }

    Ok((conditions.join(" AND "), params))
}

fn order_and_limits(query: &ListQuery) -> Result<String, StoreError> {
    let mut sql = String::new();
    if let Some((column, direction)) = &query.order {
        sql.push_str(&format!(" ORDER BY t.{} {}", quote_ident(column)?, direction.to_sql()));
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    if let Some(offset) = query.offset {
        sql.push_str(&format!(" OFFSET {}", offset));
    }
    Ok(sql)
}

fn bind_text<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    params: &'q [String],
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    params.iter().fold(q, |q, p| q.bind(p.as_str()))
}

/// Bind a normalized JSON value. Values reach the store already validated,
/// so only scalar shapes occur; the placeholder cast handles coercion.
fn bind_value<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    value: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match value {
        Value::Null => q.bind(None::<String>),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        other => q.bind(other.clone()),
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            StoreError::UniqueViolation(db.message().to_string())
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(e.to_string())
        }
        sqlx::Error::Io(_) => StoreError::Unavailable(e.to_string()),
        _ => StoreError::Sqlx(e),
    }
}

fn row_json(row: &sqlx::postgres::PgRow) -> Result<Value, StoreError> {
    row.try_get::<Value, _>("row").map_err(map_sqlx)
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    async fn select(&self, def: &ResourceDef, query: &ListQuery) -> Result<Vec<Value>, StoreError> {
        let table = quote_ident(def.table)?;
        let (predicate, params) = where_clause(query)?;
        let mut sql = format!("SELECT to_jsonb(t.*) AS row FROM {} t", table);
        if !predicate.is_empty() {
            sql.push_str(&format!(" WHERE {}", predicate));
        }
        sql.push_str(&order_and_limits(query)?);

        let rows = bind_text(sqlx::query(&sql), &params)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.iter().map(row_json).collect()
    }

    async fn count(&self, def: &ResourceDef, query: &ListQuery) -> Result<i64, StoreError> {
        let table = quote_ident(def.table)?;
        let (predicate, params) = where_clause(query)?;
        let mut sql = format!("SELECT COUNT(*) AS count FROM {} t", table);
        if !predicate.is_empty() {
            sql.push_str(&format!(" WHERE {}", predicate));
        }

        let row = bind_text(sqlx::query(&sql), &params)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.try_get("count").map_err(map_sqlx)
    }

    async fn get(&self, def: &ResourceDef, id: Uuid) -> Result<Option<Value>, StoreError> {
        let table = quote_ident(def.table)?;
        let sql = format!(
            "SELECT to_jsonb(t.*) AS row FROM {} t WHERE t.\"id\" = $1::uuid",
            table
        );
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.as_ref().map(row_json).transpose()
    }

    async fn insert(&self, def: &ResourceDef, row: Map<String, Value>) -> Result<Value, StoreError> {
        let table = quote_ident(def.table)?;
        let mut columns = Vec::with_capacity(row.len());
        let mut placeholders = Vec::with_capacity(row.len());
        let mut values = Vec::with_capacity(row.len());

        for (i, (column, value)) in row.iter().enumerate() {
            columns.push(quote_ident(column)?);
            placeholders.push(format!("${}{}", i + 1, column_cast(def, column)));
            values.push(value);
        }

        // Single statement with RETURNING: the create either fully happens
        // or not at all, and the response is the stored row.
        let sql = format!(
            "INSERT INTO {} AS t ({}) VALUES ({}) RETURNING to_jsonb(t.*) AS row",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );

        let q = values.into_iter().fold(sqlx::query(&sql), bind_value);
        let row = q.fetch_one(&self.pool).await.map_err(map_sqlx)?;
        row_json(&row)
    }

    async fn update(
        &self,
        def: &ResourceDef,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> Result<Option<Value>, StoreError> {
        let table = quote_ident(def.table)?;
        let mut assignments = Vec::with_capacity(changes.len());
        let mut values = Vec::with_capacity(changes.len());

        for (i, (column, value)) in changes.iter().enumerate() {
            assignments.push(format!(
                "{} = ${}{}",
                quote_ident(column)?,
                i + 1,
                column_cast(def, column)
            ));
            values.push(value);
        }

        let sql = format!(
            "UPDATE {} AS t SET {} WHERE t.\"id\" = ${}::uuid RETURNING to_jsonb(t.*) AS row",
            table,
            assignments.join(", "),
            changes.len() + 1
        );

        let q = values
            .into_iter()
            .fold(sqlx::query(&sql), bind_value)
            .bind(id.to_string());
        let row = q.fetch_optional(&self.pool).await.map_err(map_sqlx)?;
        row.as_ref().map(row_json).transpose()
    }

    async fn delete(&self, def: &ResourceDef, id: Uuid) -> Result<bool, StoreError> {
        let table = quote_ident(def.table)?;
        let sql = format!("DELETE FROM {} WHERE \"id\" = $1::uuid RETURNING \"id\"", table);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(row.is_some())
    }

    async fn sum(
        &self,
        def: &ResourceDef,
        column: &str,
        query: &ListQuery,
    ) -> Result<f64, StoreError> {
        let table = quote_ident(def.table)?;
        let target = quote_ident(column)?;
        let (predicate, params) = where_clause(query)?;
        let mut sql = format!(
            "SELECT COALESCE(SUM(t.{}), 0)::float8 AS sum FROM {} t",
            target, table
        );
        if !predicate.is_empty() {
            sql.push_str(&format!(" WHERE {}", predicate));
        }

        let row = bind_text(sqlx::query(&sql), &params)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        row.try_get("sum").map_err(map_sqlx)
    }

    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }
}
