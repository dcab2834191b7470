//! Import request parameters

use serde::{Deserialize, Serialize};

/// A user's request to import iNat observations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawImportRequest")]
pub struct ImportRequest {
    /// iNat login, surrounding whitespace removed
    pub username: String,
    /// Comma or space separated iNat observation ids
    pub id_list: String,
    /// Import every importable observation; `id_list` is not examined
    pub select_all: bool,
    pub consent: bool,
}

#[derive(Deserialize)]
struct RawImportRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    id_list: String,
    #[serde(default)]
    select_all: bool,
    #[serde(default)]
    consent: bool,
}

impl From<RawImportRequest> for ImportRequest {
    fn from(raw: RawImportRequest) -> Self {
        ImportRequest::new(&raw.username, &raw.id_list, raw.select_all, raw.consent)
    }
}

impl ImportRequest {
    pub fn new(username: &str, id_list: &str, select_all: bool, consent: bool) -> Self {
        Self {
            username: username.trim().to_string(),
            id_list: id_list.to_string(),
            select_all,
            consent,
        }
    }

    /// Distinct listed ids in first-seen order, empty when importing everything
    pub fn ids(&self) -> Vec<&str> {
        if self.select_all {
            return Vec::new();
        }
        let mut ids: Vec<&str> = Vec::new();
        for id in self
            .id_list
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|id| !id.is_empty())
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Number of observations the job will import, unknown for select-all
    pub fn importable_count(&self) -> Option<usize> {
        (!self.select_all).then(|| self.ids().len())
    }
}
