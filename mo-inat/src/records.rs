//! Lookups against observations that already exist

use serde::{Deserialize, Serialize};

/// Read-only view of existing observations
pub trait ExistingRecords {
    /// Observations imported from iNat observation `inat_id`
    fn imported_from(&self, inat_id: &str) -> Vec<u64>;

    /// Observations whose notes contain `text`
    fn notes_containing(&self, text: &str) -> Vec<u64>;
}

/// The fields import validation needs from an observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingObservation {
    pub id: u64,
    #[serde(default)]
    pub inat_id: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Observations held in memory (tests, CLI record dumps)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryRecords(pub Vec<ExistingObservation>);

impl ExistingRecords for InMemoryRecords {
    fn imported_from(&self, inat_id: &str) -> Vec<u64> {
        self.0
            .iter()
            .filter(|obs| obs.inat_id.as_deref() == Some(inat_id))
            .map(|obs| obs.id)
            .collect()
    }

    fn notes_containing(&self, text: &str) -> Vec<u64> {
        self.0
            .iter()
            .filter(|obs| obs.notes.contains(text))
            .map(|obs| obs.id)
            .collect()
    }
}
