//! List-query construction: pagination arithmetic plus translation of query
//! parameters (search, per-resource filters) into a gateway-neutral form.

use std::collections::HashMap;

use crate::config;
use crate::error::ApiError;
use crate::resource::descriptor::{FieldKind, ResourceDef};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Exact-match predicate on a declared filterable column.
#[derive(Debug, Clone)]
pub struct EqFilter {
    pub column: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

/// Gateway-neutral description of a list/count query. Both the Postgres and
/// the in-memory gateway interpret this identically, which is what keeps the
/// filtered-total consistent with the returned page.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub search_columns: Vec<&'static str>,
    pub filters: Vec<EqFilter>,
    pub order: Option<(&'static str, SortDirection)>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    /// Equality filter on a single column, no paging. Used by the auth and
    /// dashboard handlers for point lookups and aggregates.
    pub fn filter_eq(column: &'static str, value: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            filters: vec![EqFilter { column, value: value.into(), kind }],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        // parse_pagination rejects page/limit pairs whose product overflows
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Parse `page` and `limit` with explicit validation: a non-numeric value is
/// a validation error, never a silent NaN-equivalent.
pub fn parse_pagination(params: &HashMap<String, String>) -> Result<Pagination, ApiError> {
    let pagination = &config::config().pagination;

    let page = match params.get("page") {
        None => 1,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| ApiError::validation("page must be a positive integer"))?,
    };

    let limit = match params.get("limit") {
        None => pagination.default_limit,
        Some(raw) => raw
            .parse::<i64>()
            .ok()
            .filter(|l| *l >= 1)
            .ok_or_else(|| ApiError::validation("limit must be a positive integer"))?,
    };

    let limit = limit.min(pagination.max_limit);

    // The skip arithmetic must stay in range; a page that far out is a
    // client error, not a panic
    if (page - 1).checked_mul(limit).is_none() {
        return Err(ApiError::validation("page is out of range"));
    }

    Ok(Pagination { page, limit })
}

/// Reject filter values the column's type cannot hold before they reach a
/// gateway. The SQL gateway casts each bind to the column type, so an
/// unparseable value would otherwise surface as a store error instead of a
/// validation error (and the in-memory gateway would ignore it entirely).
fn check_filter_value(column: &str, kind: FieldKind, value: &str) -> Result<(), ApiError> {
    let ok = match kind {
        FieldKind::Text | FieldKind::Status => true,
        FieldKind::Integer => value.parse::<i64>().is_ok(),
        FieldKind::Float => value.parse::<f64>().is_ok(),
        FieldKind::Bool => value.parse::<bool>().is_ok(),
        FieldKind::Uuid => uuid::Uuid::parse_str(value).is_ok(),
        FieldKind::Date => chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        FieldKind::DateTime => chrono::DateTime::parse_from_rfc3339(value).is_ok(),
    };
    if ok {
        Ok(())
    } else {
        Err(ApiError::validation(format!(
            "{} is not a valid value for {}",
            value, column
        )))
    }
}

/// Build the list query for a resource from its raw query parameters.
///
/// Unknown parameters are ignored; declared filterable fields become exact
/// matches, and `search` spans the resource's searchable column set. Rows
/// come back newest-first.
pub fn build_list_query(
    def: &'static ResourceDef,
    params: &HashMap<String, String>,
    pagination: Pagination,
) -> Result<ListQuery, ApiError> {
    let mut filters = Vec::new();
    for column in def.filterable {
        if let Some(value) = params.get(*column) {
            if value.is_empty() {
                continue;
            }
            // Registry tests guarantee filterable columns are declared fields
            let Some(field) = def.field(column) else { continue };
            check_filter_value(column, field.kind, value)?;
            filters.push(EqFilter {
                column,
                value: value.clone(),
                kind: field.kind,
            });
        }
    }

    let search = params
        .get("search")
        .filter(|s| !s.is_empty() && !def.searchable.is_empty())
        .cloned();

    Ok(ListQuery {
        search,
        search_columns: def.searchable.to_vec(),
        filters,
        order: Some(("created_at", SortDirection::Desc)),
        limit: Some(pagination.limit),
        offset: Some(pagination.offset()),
    })
}
