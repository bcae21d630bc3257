//! Per-resource configuration for the generic CRUD engine.
//!
//! A `ResourceDef` is the only thing that differs between resources: table
//! name, typed field set, searchable/filterable columns and an optional
//! status machine. The handlers and the persistence gateway are shared.

/// Wire/storage type of a resource field. Drives payload validation and the
/// parameter casts in generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Bool,
    Uuid,
    Date,
    DateTime,
    Status,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

pub const fn req(name: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, kind, required: true }
}

pub const fn opt(name: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, kind, required: false }
}

/// Closed status value set, with an optional transition table.
///
/// When `transitions` is `None` any value from `values` may overwrite any
/// other. When present, an update may only move along a listed edge
/// (writing the current value again is always a no-op and allowed).
#[derive(Debug, Clone, Copy)]
pub struct StatusDef {
    pub values: &'static [&'static str],
    pub default: &'static str,
    pub transitions: Option<&'static [(&'static str, &'static [&'static str])]>,
}

impl StatusDef {
    pub fn allows(&self, value: &str) -> bool {
        self.values.contains(&value)
    }

    /// Whether `from -> to` is a legal move under this machine.
    pub fn can_transition(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        match self.transitions {
            None => self.allows(to),
            Some(table) => table
                .iter()
                .find(|(state, _)| *state == from)
                .map(|(_, targets)| targets.contains(&to))
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceDef {
    /// Path segment under /api, e.g. "inventory-alerts"
    pub name: &'static str,
    /// Backing table, e.g. "inventory_alerts"
    pub table: &'static str,
    /// Array key in the list envelope, e.g. "alerts"
    pub list_key: &'static str,
    pub fields: &'static [FieldDef],
    /// Columns covered by the free-text `search` query parameter
    pub searchable: &'static [&'static str],
    /// Fields exposed as exact-match query parameters on list
    pub filterable: &'static [&'static str],
    pub status: Option<StatusDef>,
}

impl ResourceDef {
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MACHINE: StatusDef = StatusDef {
        values: &["pending", "confirmed", "completed", "cancelled"],
        default: "pending",
        transitions: Some(&[
            ("pending", &["confirmed", "cancelled"]),
            ("confirmed", &["completed", "cancelled"]),
        ]),
    };

    const FREE: StatusDef = StatusDef {
        values: &["available", "occupied", "maintenance"],
        default: "available",
        transitions: None,
    };

    #[test]
    fn transition_table_is_enforced() {
        assert!(MACHINE.can_transition("pending", "confirmed"));
        assert!(MACHINE.can_transition("confirmed", "completed"));
        assert!(MACHINE.can_transition("pending", "cancelled"));
        assert!(!MACHINE.can_transition("pending", "completed"));
        assert!(!MACHINE.can_transition("completed", "pending"));
        assert!(!MACHINE.can_transition("cancelled", "confirmed"));
    }

    #[test]
    fn same_state_write_is_always_allowed() {
        assert!(MACHINE.can_transition("completed", "completed"));
        assert!(FREE.can_transition("occupied", "occupied"));
    }

    #[test]
    fn free_machines_allow_any_listed_value() {
        assert!(FREE.can_transition("available", "maintenance"));
        assert!(FREE.can_transition("maintenance", "available"));
        assert!(!FREE.can_transition("available", "demolished"));
    }
}
