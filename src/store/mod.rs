//! Persistence gateway: the single data-access abstraction every handler
//! goes through. One Postgres implementation for production, one in-memory
//! implementation with the same observable semantics for tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::resource::descriptor::ResourceDef;
use crate::resource::query::ListQuery;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Invalid SQL identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

/// Dynamic record access for a configured resource. Rows travel as JSON
/// objects; identifiers and timestamps are assigned by the caller so both
/// implementations persist exactly what they are given.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn select(&self, def: &ResourceDef, query: &ListQuery) -> Result<Vec<Value>, StoreError>;

    /// Row count under the same predicate as `select` (filtered total).
    async fn count(&self, def: &ResourceDef, query: &ListQuery) -> Result<i64, StoreError>;

    async fn get(&self, def: &ResourceDef, id: Uuid) -> Result<Option<Value>, StoreError>;

    /// Insert one row and return it as stored. A single atomic statement in
    /// the Postgres implementation - no insert-then-refetch.
    async fn insert(&self, def: &ResourceDef, row: Map<String, Value>) -> Result<Value, StoreError>;

    /// Apply a partial change set; `None` when no row matched.
    async fn update(
        &self,
        def: &ResourceDef,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> Result<Option<Value>, StoreError>;

    /// Hard delete; `false` when no row matched.
    async fn delete(&self, def: &ResourceDef, id: Uuid) -> Result<bool, StoreError>;

    /// SUM of a numeric column under the query predicate (0 when empty).
    async fn sum(&self, def: &ResourceDef, column: &str, query: &ListQuery)
        -> Result<f64, StoreError>;

    /// Connectivity probe for /health.
    async fn health(&self) -> Result<(), StoreError>;
}
