//! # iNaturalist import validation
//!
//! Checks an import request before an import job is accepted. Validation
//! runs a fixed sequence of steps and stops at the first failure; the
//! caller shows the returned message and lets the user fix the form.
//!
//! Persistence stays outside this crate: lookups of already-imported and
//! mirrored observations go through [`ExistingRecords`].

pub mod records;
pub mod request;
pub mod validator;

pub use records::{ExistingObservation, ExistingRecords, InMemoryRecords};
pub use request::ImportRequest;
pub use validator::{ImportOutcome, ImportRejection, ImportValidator};
