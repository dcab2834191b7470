//! Dynamic attribute binder
//!
//! Turns an entity's field specs into the attributes a search form posts.
//! Each field gets a primary attribute named after its key; range kinds add
//! `<key>_range` and list kinds add `<key>_id`. Nothing here is specific to
//! any entity, so a new table row with a known tag binds with no changes.

use crate::schema::{Entity, FieldSpec, StorageType};
use serde::Serialize;
use std::collections::HashMap;

/// One form attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundAttribute {
    pub name: String,
    pub storage: StorageType,
}

/// Which attribute of a field a form parameter feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Primary,
    Companion,
}

/// A field and its form attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundField {
    pub spec: FieldSpec,
    pub primary: BoundAttribute,
    pub companion: Option<BoundAttribute>,
}

impl BoundField {
    pub fn bind(spec: FieldSpec) -> Self {
        let primary = BoundAttribute {
            name: spec.key.to_string(),
            storage: spec.kind.storage(),
        };
        let companion = spec
            .kind
            .companion()
            .map(|(suffix, storage)| BoundAttribute {
                name: format!("{}{}", spec.key, suffix),
                storage,
            });
        Self {
            spec,
            primary,
            companion,
        }
    }

    pub fn key(&self) -> &'static str {
        self.spec.key
    }

    pub fn attributes(&self) -> impl Iterator<Item = &BoundAttribute> {
        std::iter::once(&self.primary).chain(self.companion.as_ref())
    }
}

/// The form-backing schema for one entity
#[derive(Debug, Clone)]
pub struct FormSchema {
    entity: Entity,
    fields: Vec<BoundField>,
    by_attribute: HashMap<String, (usize, Slot)>,
}

impl FormSchema {
    pub fn bind(entity: Entity, specs: &[FieldSpec]) -> Self {
        let fields: Vec<BoundField> = specs.iter().copied().map(BoundField::bind).collect();

        let mut by_attribute = HashMap::new();
        for (index, field) in fields.iter().enumerate() {
            by_attribute.insert(field.primary.name.clone(), (index, Slot::Primary));
            if let Some(companion) = &field.companion {
                by_attribute.insert(companion.name.clone(), (index, Slot::Companion));
            }
        }

        Self {
            entity,
            fields,
            by_attribute,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Fields in table order
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&BoundField> {
        match self.by_attribute.get(key) {
            Some((index, Slot::Primary)) => self.fields.get(*index),
            _ => None,
        }
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// The field and slot a form attribute name belongs to
    pub fn attribute(&self, name: &str) -> Option<(&BoundField, Slot)> {
        let (index, slot) = self.by_attribute.get(name)?;
        self.fields.get(*index).map(|field| (field, *slot))
    }

    /// Every form attribute, fields in table order, primary before companion
    pub fn attributes(&self) -> impl Iterator<Item = &BoundAttribute> {
        self.fields.iter().flat_map(|field| field.attributes())
    }

    /// Form prefill values declared by the table
    pub fn defaults(&self) -> Vec<(&'static str, &'static str)> {
        self.fields
            .iter()
            .filter_map(|field| field.spec.default.map(|d| (field.key(), d)))
            .collect()
    }
}
