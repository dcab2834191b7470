//! Filter assembly
//!
//! Runs every bound field of a form through its coercer, collects every
//! failure instead of stopping at the first, and applies the legacy
//! `synonyms_of` / `children_of` parameters. The result is either a
//! [`NormalizedFilter`] ready for the query executor or the full list of
//! field errors.

use crate::binder::FormSchema;
use crate::coerce::{
    check_bounding_box, field_coercer, FieldInput, FilterValue, BOX_EDGES, BOX_FIELD,
};
use crate::error::{FieldError, ValidationErrors};
use crate::raw::RawParams;
use mo_common::config::SearchConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Validated filter values keyed by field
///
/// Absence is the only way a field is unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedFilter(BTreeMap<String, FilterValue>);

impl NormalizedFilter {
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn insert(&mut self, key: &str, value: FilterValue) {
        self.0.insert(key.to_string(), value);
    }
}

/// A deprecated parameter was honored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeprecationNotice {
    pub parameter: &'static str,
    pub message: String,
}

/// Successful assembly
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assembly {
    pub filter: NormalizedFilter,
    pub notices: Vec<DeprecationNotice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Emit a warning log line for each deprecated parameter used
    pub log_deprecations: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            log_deprecations: true,
        }
    }
}

impl From<&SearchConfig> for AssemblyOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            log_deprecations: config.deprecation_notices,
        }
    }
}

/// Old-style taxon parameters, applied in this order
struct LegacyParameter {
    name: &'static str,
    forces: &'static [&'static str],
}

const NAMES_FIELD: &str = "names";

const LEGACY_PARAMETERS: [LegacyParameter; 2] = [
    LegacyParameter {
        name: "synonyms_of",
        forces: &["include_synonyms"],
    },
    LegacyParameter {
        name: "children_of",
        forces: &["include_subtaxa", "exclude_original_names"],
    },
];

/// Assemble `params` against `form` with default options
pub fn assemble(form: &FormSchema, params: &RawParams) -> Result<Assembly, ValidationErrors> {
    assemble_with(form, params, AssemblyOptions::default())
}

pub fn assemble_with(
    form: &FormSchema,
    params: &RawParams,
    options: AssemblyOptions,
) -> Result<Assembly, ValidationErrors> {
    let mut filter = NormalizedFilter::default();
    let mut errors: Vec<FieldError> = Vec::new();

    for field in form.fields() {
        let primary = params.values(&field.primary.name);
        let companion = field
            .companion
            .as_ref()
            .map(|c| params.values(&c.name))
            .unwrap_or_default();
        let input = FieldInput::new(&primary, &companion);
        if input.is_empty() {
            continue;
        }

        match field_coercer(&field.spec).parse(&input) {
            Ok(Some(value)) => filter.insert(field.key(), value),
            Ok(None) => {}
            Err(e) => errors.push(e.for_field(field.key())),
        }
    }

    if BOX_EDGES.iter().all(|edge| form.has_field(edge)) {
        if let Err(e) = check_bounding_box(|edge| params.is_present(edge)) {
            errors.push(e.for_field(BOX_FIELD));
        }
    }

    let notices = apply_legacy_parameters(form, params, &mut filter, &mut errors, options);

    if !errors.is_empty() {
        debug!(
            "{} search rejected: {} field error(s)",
            form.entity(),
            errors.len()
        );
        return Err(ValidationErrors(errors));
    }

    debug!(
        "{} search assembled: {} filter(s), {} notice(s)",
        form.entity(),
        filter.len(),
        notices.len()
    );
    Ok(Assembly { filter, notices })
}

fn apply_legacy_parameters(
    form: &FormSchema,
    params: &RawParams,
    filter: &mut NormalizedFilter,
    errors: &mut Vec<FieldError>,
    options: AssemblyOptions,
) -> Vec<DeprecationNotice> {
    let mut notices = Vec::new();

    for legacy in &LEGACY_PARAMETERS {
        let values = params.values(legacy.name);
        if values.is_empty() {
            continue;
        }

        let Some(names) = form.field(NAMES_FIELD) else {
            debug!("{} ignored: {} form has no names", legacy.name, form.entity());
            continue;
        };
        if !legacy.forces.iter().all(|key| form.has_field(key)) {
            debug!("{} ignored: {} form lacks {:?}", legacy.name, form.entity(), legacy.forces);
            continue;
        }

        // Legacy values are typed like the names text box: ids or names
        let input = FieldInput::new(&values, &[]);
        match field_coercer(&names.spec).parse(&input) {
            Ok(Some(value)) => {
                filter.insert(NAMES_FIELD, value);
                for key in legacy.forces {
                    filter.insert(key, FilterValue::Boolean(true));
                }
            }
            Ok(None) => continue,
            Err(e) => {
                errors.push(e.for_field(legacy.name));
                continue;
            }
        }

        let message = format!(
            "'{}' is deprecated; use '{}' with {}",
            legacy.name,
            NAMES_FIELD,
            legacy
                .forces
                .iter()
                .map(|key| format!("{}=true", key))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if options.log_deprecations {
            warn!("{}", message);
        }
        notices.push(DeprecationNotice {
            parameter: legacy.name,
            message,
        });
    }

    notices
}

/// Render `filter` back into form parameters for `form`
pub fn form_values(form: &FormSchema, filter: &NormalizedFilter) -> RawParams {
    let mut params = RawParams::new();
    for field in form.fields() {
        let Some(value) = filter.get(field.key()) else {
            continue;
        };
        let rendered = field_coercer(&field.spec).format(value);
        if let Some(primary) = rendered.primary {
            params.insert(field.primary.name.as_str(), primary);
        }
        if let (Some(companion), Some(attribute)) = (rendered.companion, &field.companion) {
            params.insert(attribute.name.as_str(), companion);
        }
    }
    params
}
