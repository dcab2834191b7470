//! Multi-valued autocompleter fields
//!
//! The visible text box takes one item per line or comma. The hidden
//! `<key>_id` companion holds whatever the autocompleter resolved; when it
//! is filled in, the text is ignored.

use super::{Coercer, FieldInput, FilterValue, FormValue};
use crate::error::CoerceError;
use crate::schema::Kind;

/// Split list input on commas and newlines, dropping blanks and repeats
pub fn split_list(values: &[&str]) -> Vec<String> {
    let mut items: Vec<String> = Vec::new();
    for item in values
        .iter()
        .flat_map(|v| v.split(|c: char| c == ',' || c == '\n'))
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        if !items.iter().any(|existing| existing == item) {
            items.push(item.to_string());
        }
    }
    items
}

fn parse_ids(items: &[String]) -> Result<Vec<u64>, CoerceError> {
    items
        .iter()
        .map(|item| {
            item.parse::<u64>()
                .map_err(|_| CoerceError::invalid_value(item.as_str()))
        })
        .collect()
}

fn join_ids(ids: &[u64], separator: &str) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Coercer for `list_of_ids` and `list_of_strings` fields
pub struct ListCoercer(pub Kind);

impl Coercer for ListCoercer {
    fn kind(&self) -> Kind {
        self.0
    }

    fn parse(&self, input: &FieldInput<'_>) -> Result<Option<FilterValue>, CoerceError> {
        let selected = split_list(input.companion);
        if !selected.is_empty() {
            return Ok(Some(match self.0 {
                Kind::ListOfIds => FilterValue::Ids(parse_ids(&selected)?),
                _ => FilterValue::Strings(selected),
            }));
        }

        let typed = split_list(input.primary);
        if typed.is_empty() {
            return Ok(None);
        }
        // Typed ids are as good as selected ones
        if self.0 == Kind::ListOfIds {
            if let Ok(ids) = parse_ids(&typed) {
                return Ok(Some(FilterValue::Ids(ids)));
            }
        }
        Ok(Some(FilterValue::Strings(typed)))
    }

    fn format(&self, value: &FilterValue) -> FormValue {
        match value {
            FilterValue::Ids(ids) => FormValue {
                primary: Some(join_ids(ids, "\n")),
                companion: Some(join_ids(ids, ",")),
            },
            FilterValue::Strings(items) => FormValue::primary(items.join("\n")),
            _ => FormValue::default(),
        }
    }
}
