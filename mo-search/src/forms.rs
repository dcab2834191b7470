//! Process-wide search forms
//!
//! Bound once from the global schema registry and shared read-only.

use crate::binder::FormSchema;
use crate::error::SchemaError;
use crate::schema::{Entity, SchemaRegistry};
use once_cell::sync::OnceCell;
use tracing::info;

/// One bound form per registered entity
#[derive(Debug, Clone)]
pub struct SearchForms {
    forms: Vec<FormSchema>,
}

static FORMS: OnceCell<SearchForms> = OnceCell::new();

impl SearchForms {
    pub fn build(registry: &SchemaRegistry) -> Self {
        let forms = registry
            .entities()
            .map(|entity| FormSchema::bind(entity, registry.fields_for(entity)))
            .collect();
        Self { forms }
    }

    /// Forms over the canonical tables, built on first use
    pub fn global() -> Result<&'static SearchForms, SchemaError> {
        FORMS.get_or_try_init(|| {
            let forms = Self::build(SchemaRegistry::global()?);
            for form in &forms.forms {
                info!(
                    "{} search form: {} fields, {} attributes",
                    form.entity(),
                    form.fields().len(),
                    form.attributes().count()
                );
            }
            Ok(forms)
        })
    }

    pub fn form(&self, entity: Entity) -> Option<&FormSchema> {
        self.forms.iter().find(|form| form.entity() == entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormSchema> {
        self.forms.iter()
    }
}

/// Shortcut for the global form of `entity`
pub fn search_form(entity: Entity) -> Result<&'static FormSchema, SchemaError> {
    let forms = SearchForms::global()?;
    forms.form(entity).ok_or(SchemaError::MissingEntity(entity))
}
