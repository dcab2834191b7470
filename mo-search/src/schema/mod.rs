//! Field schema registry: canonical tables projected into typed field specs

mod kind;
mod registry;
mod table;

pub use kind::{Kind, StorageType};
pub use registry::{FieldSpec, SchemaRegistry};
pub use table::{canonical_tables, Entity, EntityTable, QueryAttribute};
