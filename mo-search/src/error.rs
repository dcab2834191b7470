//! Schema build errors and per-field validation errors

use crate::schema::Entity;
use mo_common::ErrorKind;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failures while building the schema registry from its tables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unrecognized coercion kind '{tag}' for {entity}.{key}")]
    UnrecognizedCoercionKind {
        entity: Entity,
        key: String,
        tag: String,
    },

    #[error("Duplicate field '{key}' in {entity} table")]
    DuplicateField { entity: Entity, key: String },

    #[error("No search table registered for {0}")]
    MissingEntity(Entity),
}

impl SchemaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SchemaError::UnrecognizedCoercionKind { .. } => ErrorKind::UnrecognizedCoercionKind,
            SchemaError::DuplicateField { .. } | SchemaError::MissingEntity(_) => {
                ErrorKind::InvalidValue
            }
        }
    }
}

/// A coercer's rejection of one field's input, before it is tied to a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoerceError {
    pub kind: ErrorKind,
    pub args: Vec<String>,
}

impl CoerceError {
    pub fn new(kind: ErrorKind, arg: impl Into<String>) -> Self {
        Self {
            kind,
            args: vec![arg.into()],
        }
    }

    pub fn invalid_value(arg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidValue, arg)
    }

    pub fn out_of_range(arg: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfRange, arg)
    }

    pub fn invalid_date(arg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDateFormat, arg)
    }

    pub fn too_many_values(count: usize) -> Self {
        Self::new(ErrorKind::InvalidValue, format!("{} values given", count))
    }

    /// Attach the failing field's key
    pub fn for_field(self, field: &str) -> FieldError {
        FieldError {
            field: field.to_string(),
            kind: self.kind,
            args: self.args,
        }
    }
}

/// One failed search field: `(field_key, kind, message_args)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: ErrorKind,
    pub args: Vec<String>,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)?;
        if !self.args.is_empty() {
            write!(f, " ({})", self.args.join(", "))?;
        }
        Ok(())
    }
}

/// Every field failure found while assembling one request
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(
            f,
            "{} invalid search field(s): {}",
            self.0.len(),
            fields.join("; ")
        )
    }
}

impl ValidationErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// First failure recorded against `field`
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = CoerceError::invalid_date("2021-13").for_field("date");
        assert_eq!(err.to_string(), "date: invalid_date_format (2021-13)");
    }

    #[test]
    fn test_validation_errors_display() {
        let errors = ValidationErrors(vec![
            CoerceError::out_of_range("95").for_field("north"),
            CoerceError::invalid_value("maybe").for_field("has_images"),
        ]);
        assert_eq!(
            errors.to_string(),
            "2 invalid search field(s): north: out_of_range (95); has_images: invalid_value (maybe)"
        );
        assert_eq!(errors.for_field("has_images").map(|e| e.kind), Some(ErrorKind::InvalidValue));
    }

    #[test]
    fn test_schema_error_kind() {
        let err = SchemaError::UnrecognizedCoercionKind {
            entity: Entity::Names,
            key: "mystery".to_string(),
            tag: "list_of_glaciers".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::UnrecognizedCoercionKind);
        assert_eq!(
            err.to_string(),
            "Unrecognized coercion kind 'list_of_glaciers' for names.mystery"
        );
    }
}
