//! Import Request Validator
//!
//! Decides whether an iNat import request may start an import job.
//!
//! # Validation Steps
//! Run in order; the first failing step rejects the request.
//! 1. **Username**: iNat login present
//! 2. **Characters**: id list holds only digits, spaces and commas
//! 3. **Designation**: "import all" checked, or at least one id listed
//! 4. **Length**: id list no longer than the configured limit
//! 5. **Previous imports**: no listed id was already imported
//! 6. **Mirrors**: no listed id is a copy of an MO observation
//! 7. **Consent**: user agreed to the import terms
//!
//! Steps 2 and 4-6 look at the id list and are skipped when importing
//! everything. Steps 5 and 6 report every offending id, not just the first.
//!
//! # Example
//! ```rust
//! use mo_inat::{ImportOutcome, ImportRequest, ImportValidator, InMemoryRecords};
//!
//! let validator = ImportValidator::default();
//! let request = ImportRequest::new("fungus_fan", "12345, 67890", false, true);
//!
//! let outcome = validator.validate(&request, &InMemoryRecords::default());
//! assert!(matches!(outcome, ImportOutcome::Accepted));
//! ```

use crate::records::ExistingRecords;
use crate::request::ImportRequest;
use mo_common::config::{InatConfig, DEFAULT_INAT_SITE, DEFAULT_MAX_ID_LIST_LENGTH};
use mo_common::ErrorKind;
use serde::Serialize;
use tracing::{debug, warn};

/// Why a request was turned away
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRejection {
    pub kind: ErrorKind,
    /// Localization key of the warning shown to the user
    pub message_key: &'static str,
    /// English rendering of the warning
    pub message: String,
    /// The user can fix the form and submit again
    pub may_retry: bool,
}

impl ImportRejection {
    fn new(kind: ErrorKind, message_key: &'static str, message: String) -> Self {
        Self {
            kind,
            message_key,
            message,
            may_retry: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    Accepted,
    Rejected(ImportRejection),
}

impl ImportOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ImportOutcome::Accepted)
    }

    pub fn rejection(&self) -> Option<&ImportRejection> {
        match self {
            ImportOutcome::Accepted => None,
            ImportOutcome::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Import Request Validator
#[derive(Debug, Clone)]
pub struct ImportValidator {
    /// iNat base URL, no trailing slash
    site: String,
    /// Longest accepted id list, in characters
    max_id_list_length: usize,
}

impl Default for ImportValidator {
    fn default() -> Self {
        Self::new(DEFAULT_INAT_SITE, DEFAULT_MAX_ID_LIST_LENGTH)
    }
}

impl From<&InatConfig> for ImportValidator {
    fn from(config: &InatConfig) -> Self {
        Self::new(&config.site, config.max_id_list_length)
    }
}

type Step = Result<(), ImportRejection>;

impl ImportValidator {
    pub fn new(site: &str, max_id_list_length: usize) -> Self {
        Self {
            site: site.trim_end_matches('/').to_string(),
            max_id_list_length,
        }
    }

    /// URL of an iNat observation as it appears in mirrored notes
    pub fn observation_url(&self, inat_id: &str) -> String {
        format!("{}/observations/{}", self.site, inat_id)
    }

    /// Validate `request`, stopping at the first failing step
    pub fn validate(
        &self,
        request: &ImportRequest,
        records: &dyn ExistingRecords,
    ) -> ImportOutcome {
        let result = self.check_all(request, records);
        match result {
            Ok(()) => {
                debug!(
                    "iNat import accepted for {} ({})",
                    request.username,
                    request
                        .importable_count()
                        .map_or_else(|| "all observations".to_string(), |n| format!("{} ids", n))
                );
                ImportOutcome::Accepted
            }
            Err(rejection) => {
                warn!(
                    "iNat import rejected for '{}': {} ({})",
                    request.username, rejection.kind, rejection.message
                );
                ImportOutcome::Rejected(rejection)
            }
        }
    }

    fn check_all(&self, request: &ImportRequest, records: &dyn ExistingRecords) -> Step {
        check_username(request)?;
        if !request.select_all {
            check_characters(request)?;
        }
        check_designated(request)?;
        if !request.select_all {
            self.check_length(request)?;
            check_previous_imports(request, records)?;
            self.check_mirrors(request, records)?;
        }
        check_consent(request)
    }

    fn check_length(&self, request: &ImportRequest) -> Step {
        let length = request.id_list.chars().count();
        if length <= self.max_id_list_length {
            return Ok(());
        }
        Err(ImportRejection::new(
            ErrorKind::TooManyIdentifiers,
            "inat_too_many_ids_listed",
            format!(
                "Too many ids listed ({} characters, limit {}). Import fewer at a time or use \"import all\".",
                length, self.max_id_list_length
            ),
        ))
    }

    fn check_mirrors(&self, request: &ImportRequest, records: &dyn ExistingRecords) -> Step {
        let mirrors: Vec<String> = request
            .ids()
            .into_iter()
            .flat_map(|inat_id| {
                records
                    .notes_containing(&self.observation_url(inat_id))
                    .into_iter()
                    .map(move |obs| format!("iNat {} is a “mirror” of existing MO Observation {}", inat_id, obs))
            })
            .collect();

        if mirrors.is_empty() {
            return Ok(());
        }
        Err(ImportRejection::new(
            ErrorKind::AlreadyMirrored,
            "inat_already_mirrored",
            mirrors.join("\n"),
        ))
    }
}

fn check_username(request: &ImportRequest) -> Step {
    if !request.username.is_empty() {
        return Ok(());
    }
    Err(ImportRejection::new(
        ErrorKind::MissingRequiredField,
        "inat_missing_username",
        "Please enter your iNat username.".to_string(),
    ))
}

fn check_characters(request: &ImportRequest) -> Step {
    let legal = |c: char| c.is_ascii_digit() || c == ' ' || c == ',';
    if request.id_list.chars().all(legal) {
        return Ok(());
    }
    Err(ImportRejection::new(
        ErrorKind::IllegalCharacterInIdentifierList,
        "runtime_illegal_inat_id",
        "iNat ids may contain only digits, spaces and commas.".to_string(),
    ))
}

fn check_designated(request: &ImportRequest) -> Step {
    if request.select_all || !request.id_list.trim().is_empty() {
        return Ok(());
    }
    Err(ImportRejection::new(
        ErrorKind::MissingRequiredField,
        "inat_no_imports_designated",
        "List the iNat ids to import, or check \"import all\".".to_string(),
    ))
}

fn check_previous_imports(request: &ImportRequest, records: &dyn ExistingRecords) -> Step {
    let previous: Vec<String> = request
        .ids()
        .into_iter()
        .flat_map(|inat_id| {
            records
                .imported_from(inat_id)
                .into_iter()
                .map(move |obs| format!("iNat {} previously imported as MO Observation {}", inat_id, obs))
        })
        .collect();

    if previous.is_empty() {
        return Ok(());
    }
    Err(ImportRejection::new(
        ErrorKind::DuplicateOrAlreadyImported,
        "inat_previous_import",
        previous.join("\n"),
    ))
}

fn check_consent(request: &ImportRequest) -> Step {
    if request.consent {
        return Ok(());
    }
    Err(ImportRejection::new(
        ErrorKind::ConsentRequired,
        "inat_consent_required",
        "You must consent to the import before it can proceed.".to_string(),
    ))
}
