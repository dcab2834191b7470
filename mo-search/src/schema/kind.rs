//! Coercion kinds and the storage types they bind to

use serde::Serialize;
use std::fmt;

/// How a search field's raw input is coerced into a filter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    String,
    Boolean,
    Integer,
    Float,
    Date,
    DateRange,
    RankRange,
    ConfidenceRange,
    Longitude,
    Latitude,
    ListOfIds,
    ListOfStrings,
}

/// Scalar type of a bound form attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    String,
    Boolean,
    Integer,
    Float,
    Date,
}

impl Kind {
    /// Every kind, in dispatch-table order
    pub const ALL: [Kind; 12] = [
        Kind::String,
        Kind::Boolean,
        Kind::Integer,
        Kind::Float,
        Kind::Date,
        Kind::DateRange,
        Kind::RankRange,
        Kind::ConfidenceRange,
        Kind::Longitude,
        Kind::Latitude,
        Kind::ListOfIds,
        Kind::ListOfStrings,
    ];

    /// Map a canonical table coercion tag to its kind
    ///
    /// Several tags share a kind: the `list_of_*` record tags all resolve to
    /// [`Kind::ListOfIds`], `pattern` is free text and `yes` is a boolean.
    /// The registry marks `yes` fields as [`FieldSpec::yes_only`].
    ///
    /// [`FieldSpec::yes_only`]: crate::schema::FieldSpec::yes_only
    pub fn from_tag(tag: &str) -> Option<Kind> {
        let kind = match tag {
            "string" | "pattern" => Kind::String,
            "boolean" | "yes" => Kind::Boolean,
            "integer" => Kind::Integer,
            "float" => Kind::Float,
            "date" => Kind::Date,
            "date_range" | "time" => Kind::DateRange,
            "rank_range" => Kind::RankRange,
            "confidence" => Kind::ConfidenceRange,
            "longitude" => Kind::Longitude,
            "latitude" => Kind::Latitude,
            "list_of_names" | "list_of_users" | "list_of_locations" | "list_of_projects"
            | "list_of_species_lists" | "list_of_herbaria" => Kind::ListOfIds,
            "list_of_strings" => Kind::ListOfStrings,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::Date => "date",
            Kind::DateRange => "date_range",
            Kind::RankRange => "rank_range",
            Kind::ConfidenceRange => "confidence_range",
            Kind::Longitude => "longitude",
            Kind::Latitude => "latitude",
            Kind::ListOfIds => "list_of_ids",
            Kind::ListOfStrings => "list_of_strings",
        }
    }

    /// Position in [`Kind::ALL`] and in the coercer dispatch table
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Storage type of the primary attribute
    pub fn storage(&self) -> StorageType {
        match self {
            Kind::String | Kind::RankRange | Kind::ListOfIds | Kind::ListOfStrings => {
                StorageType::String
            }
            Kind::Boolean => StorageType::Boolean,
            Kind::Integer => StorageType::Integer,
            Kind::Float | Kind::ConfidenceRange | Kind::Longitude | Kind::Latitude => {
                StorageType::Float
            }
            Kind::Date | Kind::DateRange => StorageType::Date,
        }
    }

    /// Companion attribute suffix and storage type, if the kind has one
    ///
    /// Range kinds carry the far end in `<key>_range`; list kinds carry
    /// autocompleter-selected ids in `<key>_id`.
    pub fn companion(&self) -> Option<(&'static str, StorageType)> {
        match self {
            Kind::DateRange => Some(("_range", StorageType::Date)),
            Kind::RankRange => Some(("_range", StorageType::String)),
            Kind::ConfidenceRange => Some(("_range", StorageType::Float)),
            Kind::ListOfIds | Kind::ListOfStrings => Some(("_id", StorageType::String)),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
