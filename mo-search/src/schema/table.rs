//! Canonical query-attribute tables
//!
//! One table per searchable entity. Each row names a filterable attribute,
//! its optional form default, and the coercion tag that decides how raw
//! input is parsed. Row order is the order fields appear on the search form.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Searchable record types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Names,
    Observations,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Names => "names",
            Entity::Observations => "observations",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "names" | "name" => Ok(Entity::Names),
            "observations" | "observation" => Ok(Entity::Observations),
            other => Err(format!("unknown search entity '{}'", other)),
        }
    }
}

/// One row of a canonical table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryAttribute {
    pub key: &'static str,
    pub default: Option<&'static str>,
    pub coercion: &'static str,
}

/// All rows for one entity, in declaration order
#[derive(Debug, Clone, Copy)]
pub struct EntityTable {
    pub entity: Entity,
    pub attributes: &'static [QueryAttribute],
}

const fn attr(key: &'static str, coercion: &'static str) -> QueryAttribute {
    QueryAttribute {
        key,
        default: None,
        coercion,
    }
}

const fn attr_with_default(
    key: &'static str,
    default: &'static str,
    coercion: &'static str,
) -> QueryAttribute {
    QueryAttribute {
        key,
        default: Some(default),
        coercion,
    }
}

const NAME_ATTRIBUTES: &[QueryAttribute] = &[
    attr("pattern", "pattern"),
    attr("names", "list_of_names"),
    attr("include_synonyms", "boolean"),
    attr("include_subtaxa", "boolean"),
    attr("include_immediate_subtaxa", "boolean"),
    attr("exclude_original_names", "boolean"),
    attr("rank", "rank_range"),
    attr("text_name_has", "pattern"),
    attr_with_default("misspellings", "no", "string"),
    attr("is_deprecated", "boolean"),
    attr("has_synonyms", "boolean"),
    attr("has_author", "boolean"),
    attr("author_has", "string"),
    attr("has_citation", "boolean"),
    attr("citation_has", "string"),
    attr("has_classification", "boolean"),
    attr("classification_has", "string"),
    attr("has_notes", "boolean"),
    attr("notes_has", "string"),
    attr("has_comments", "yes"),
    attr("comments_has", "string"),
    attr("has_descriptions", "boolean"),
    attr("need_description", "boolean"),
    attr("has_observations", "yes"),
    attr("ok_for_export", "boolean"),
    attr("by_users", "list_of_users"),
    attr("locations", "list_of_locations"),
    attr("species_lists", "list_of_species_lists"),
    attr("created_at", "time"),
    attr("updated_at", "time"),
];

const OBSERVATION_ATTRIBUTES: &[QueryAttribute] = &[
    attr("pattern", "pattern"),
    attr("names", "list_of_names"),
    attr("include_synonyms", "boolean"),
    attr("include_subtaxa", "boolean"),
    attr("include_immediate_subtaxa", "boolean"),
    attr("exclude_original_names", "boolean"),
    attr("confidence", "confidence"),
    attr("date", "date_range"),
    attr("by_users", "list_of_users"),
    attr("locations", "list_of_locations"),
    attr("region", "string"),
    attr("north", "latitude"),
    attr("south", "latitude"),
    attr("east", "longitude"),
    attr("west", "longitude"),
    attr("has_public_lat_lng", "boolean"),
    attr_with_default("is_collection_location", "true", "boolean"),
    attr("projects", "list_of_projects"),
    attr("species_lists", "list_of_species_lists"),
    attr("herbaria", "list_of_herbaria"),
    attr("has_specimen", "boolean"),
    attr("has_sequences", "yes"),
    attr("has_images", "boolean"),
    attr("lichen", "boolean"),
    attr("has_name", "boolean"),
    attr("has_notes", "boolean"),
    attr("notes_has", "string"),
    attr("has_notes_fields", "list_of_strings"),
    attr("has_comments", "yes"),
    attr("comments_has", "string"),
    attr("field_slips", "list_of_strings"),
    attr("created_at", "time"),
    attr("updated_at", "time"),
];

static CANONICAL_TABLES: [EntityTable; 2] = [
    EntityTable {
        entity: Entity::Names,
        attributes: NAME_ATTRIBUTES,
    },
    EntityTable {
        entity: Entity::Observations,
        attributes: OBSERVATION_ATTRIBUTES,
    },
];

/// Built-in tables for every searchable entity
pub fn canonical_tables() -> &'static [EntityTable] {
    &CANONICAL_TABLES
}
