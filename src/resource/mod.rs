pub mod descriptor;
pub mod handlers;
pub mod query;
pub mod registry;
pub mod validate;

pub use descriptor::{FieldDef, FieldKind, ResourceDef, StatusDef};
pub use query::{ListQuery, Pagination};
