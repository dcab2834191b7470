//! Raw request parameters
//!
//! Parameters arrive as a map of names to a single string or a list of
//! strings. JSON numbers and booleans are read as their string form. Blank
//! values (empty or whitespace only) count as absent.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One submitted parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Single(String),
    Many(Vec<String>),
}

impl RawValue {
    /// Trimmed, non-blank values in submission order
    pub fn values(&self) -> Vec<&str> {
        let all: Vec<&str> = match self {
            RawValue::Single(s) => vec![s.as_str()],
            RawValue::Many(v) => v.iter().map(String::as_str).collect(),
        };
        all.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn is_blank(&self) -> bool {
        self.values().is_empty()
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Single(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Single(s)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(v: Vec<&str>) -> Self {
        RawValue::Many(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for RawValue {
    fn from(v: Vec<String>) -> Self {
        RawValue::Many(v)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireScalar {
    Text(String),
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

impl WireScalar {
    fn into_string(self) -> String {
        match self {
            WireScalar::Text(s) => s,
            WireScalar::Bool(b) => b.to_string(),
            WireScalar::Unsigned(n) => n.to_string(),
            WireScalar::Signed(n) => n.to_string(),
            WireScalar::Float(n) => n.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Null,
    One(WireScalar),
    Many(Vec<Option<WireScalar>>),
}

impl<'de> Deserialize<'de> for RawValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match WireValue::deserialize(deserializer)? {
            WireValue::Null => RawValue::Many(Vec::new()),
            WireValue::One(s) => RawValue::Single(s.into_string()),
            WireValue::Many(items) => RawValue::Many(
                items
                    .into_iter()
                    .flatten()
                    .map(WireScalar::into_string)
                    .collect(),
            ),
        })
    }
}

/// Request parameters; read-only to the search core
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawParams(BTreeMap<String, RawValue>);

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.0.get(key)
    }

    /// Non-blank values submitted under `key` (empty if absent)
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.0.get(key).map(RawValue::values).unwrap_or_default()
    }

    /// Whether `key` carries at least one non-blank value
    pub fn is_present(&self, key: &str) -> bool {
        !self.values(key).is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RawValue)> {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for RawParams
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
