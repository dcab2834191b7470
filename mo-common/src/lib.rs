//! # Mushroom Observer Common Library
//!
//! Shared code for the search and import crates:
//! - Error taxonomy reported to form and import callers
//! - Configuration loading and resolution
//! - Crate-wide error and result types

pub mod config;
pub mod error;

pub use error::{Error, ErrorKind, Result};
