//! Field schema registry
//!
//! Projects the canonical tables into typed [`FieldSpec`]s. The process-wide
//! registry is built once on first use; a table row with an unknown coercion
//! tag makes that build fail and nothing is ever served from a partial
//! registry.

use super::kind::Kind;
use super::table::{canonical_tables, Entity, EntityTable};
use crate::error::SchemaError;
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use tracing::{debug, info};

/// One filterable field of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: Kind,
    /// Form prefill only; never injected into a filter
    pub default: Option<&'static str>,
    /// Boolean that can only be switched on (`yes` tag); false is rejected
    pub yes_only: bool,
}

/// Ordered field specs for each entity
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    entities: Vec<(Entity, Vec<FieldSpec>)>,
}

static REGISTRY: OnceCell<SchemaRegistry> = OnceCell::new();

const YES_TAG: &str = "yes";

impl SchemaRegistry {
    /// Build a registry from explicit tables
    pub fn build(tables: &[EntityTable]) -> Result<Self, SchemaError> {
        let mut entities = Vec::with_capacity(tables.len());

        for table in tables {
            let mut seen = HashSet::new();
            let mut specs = Vec::with_capacity(table.attributes.len());

            for attribute in table.attributes {
                let kind = Kind::from_tag(attribute.coercion).ok_or_else(|| {
                    SchemaError::UnrecognizedCoercionKind {
                        entity: table.entity,
                        key: attribute.key.to_string(),
                        tag: attribute.coercion.to_string(),
                    }
                })?;

                if !seen.insert(attribute.key) {
                    return Err(SchemaError::DuplicateField {
                        entity: table.entity,
                        key: attribute.key.to_string(),
                    });
                }

                specs.push(FieldSpec {
                    key: attribute.key,
                    kind,
                    default: attribute.default,
                    yes_only: attribute.coercion == YES_TAG,
                });
            }

            debug!("{}: {} search fields", table.entity, specs.len());
            entities.push((table.entity, specs));
        }

        Ok(Self { entities })
    }

    /// Process-wide registry over the canonical tables
    pub fn global() -> Result<&'static SchemaRegistry, SchemaError> {
        REGISTRY.get_or_try_init(|| {
            let registry = Self::build(canonical_tables())?;
            info!(
                "Schema registry built: {} entities, {} fields",
                registry.entities.len(),
                registry.entities.iter().map(|(_, f)| f.len()).sum::<usize>()
            );
            Ok(registry)
        })
    }

    /// Fields of `entity` in table order (empty if the entity has no table)
    pub fn fields_for(&self, entity: Entity) -> &[FieldSpec] {
        self.entities
            .iter()
            .find(|(e, _)| *e == entity)
            .map(|(_, specs)| specs.as_slice())
            .unwrap_or(&[])
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().map(|(e, _)| *e)
    }
}
