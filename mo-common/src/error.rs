//! Common error types for the search and import crates

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Common result type for fallible operations
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure errors (configuration, I/O)
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Classification of every user-facing or build-time failure.
///
/// Form assembly reports these per field; import validation reports the
/// first failing one. `UnrecognizedCoercionKind` only ever surfaces while the
/// schema registry is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidDateFormat,
    OutOfRange,
    IncompleteBoundingBox,
    UnrecognizedCoercionKind,
    TooManyIdentifiers,
    IllegalCharacterInIdentifierList,
    DuplicateOrAlreadyImported,
    AlreadyMirrored,
    ConsentRequired,
    MissingRequiredField,
    /// Input that cannot be read as the field's scalar type
    InvalidValue,
}

impl ErrorKind {
    /// Stable snake_case identifier, used as a localization key suffix
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidDateFormat => "invalid_date_format",
            ErrorKind::OutOfRange => "out_of_range",
            ErrorKind::IncompleteBoundingBox => "incomplete_bounding_box",
            ErrorKind::UnrecognizedCoercionKind => "unrecognized_coercion_kind",
            ErrorKind::TooManyIdentifiers => "too_many_identifiers",
            ErrorKind::IllegalCharacterInIdentifierList => {
                "illegal_character_in_identifier_list"
            }
            ErrorKind::DuplicateOrAlreadyImported => "duplicate_or_already_imported",
            ErrorKind::AlreadyMirrored => "already_mirrored",
            ErrorKind::ConsentRequired => "consent_required",
            ErrorKind::MissingRequiredField => "missing_required_field",
            ErrorKind::InvalidValue => "invalid_value",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
