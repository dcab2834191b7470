//! # Mushroom Observer search-parameter core
//!
//! Turns raw search-form parameters into typed, validated query filters.
//!
//! - [`schema`]: per-entity field specs projected from canonical tables
//! - [`coerce`]: one parser/formatter per coercion kind
//! - [`binder`]: form attributes (primary plus `_range`/`_id` companions)
//! - [`assembly`]: raw params to [`NormalizedFilter`], collecting all errors
//!
//! ```
//! use mo_search::{assemble, search_form, Entity, RawParams};
//!
//! let form = search_form(Entity::Observations).unwrap();
//! let params: RawParams = [("confidence", "50"), ("names_id", "12")].into_iter().collect();
//! let assembly = assemble(form, &params).unwrap();
//! assert_eq!(assembly.filter.len(), 2);
//! ```

pub mod assembly;
pub mod binder;
pub mod coerce;
pub mod error;
pub mod forms;
pub mod raw;
pub mod schema;

pub use assembly::{
    assemble, assemble_with, form_values, Assembly, AssemblyOptions, DeprecationNotice,
    NormalizedFilter,
};
pub use binder::{BoundAttribute, BoundField, FormSchema, Slot};
pub use coerce::{coercer_for, field_coercer, Coercer, FilterValue, Span};
pub use error::{CoerceError, FieldError, SchemaError, ValidationErrors};
pub use forms::{search_form, SearchForms};
pub use raw::{RawParams, RawValue};
pub use schema::{Entity, FieldSpec, Kind, SchemaRegistry};
