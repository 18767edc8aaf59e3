//! Schema validation.
//!
//! Validates the structural invariants of a flag list before it becomes an
//! [`ArgumentSchema`](crate::ArgumentSchema): every flag token must look
//! like `-x`, and neither tokens nor names may repeat.
//!
//! # Examples
//!
//! ```
//! use medtrack_core::*;
//!
//! let specs = [
//!     ArgumentSpec::required(ArgumentName::Name, "-n"),
//!     ArgumentSpec::optional(ArgumentName::Remarks, "-r"),
//! ];
//! assert!(validate_specs(&specs).is_empty());
//!
//! // Invalid: two specs share `-n`
//! let specs = [
//!     ArgumentSpec::required(ArgumentName::Name, "-n"),
//!     ArgumentSpec::optional(ArgumentName::Remarks, "-n"),
//! ];
//! assert_eq!(
//!     validate_specs(&specs),
//!     vec![SchemaError::DuplicateFlag("-n".to_string())]
//! );
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{ArgumentName, ArgumentSpec};

/// Schema construction errors.
///
/// These describe programming mistakes in a command's declared flags, not
/// user input problems.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Flag token is not a dash followed by at least one non-space character.
    #[error("invalid flag format: {0:?}")]
    InvalidFlag(String),
    /// Two specs share the same flag token.
    #[error("duplicate flag in schema: {0}")]
    DuplicateFlag(String),
    /// Two specs share the same argument name.
    #[error("duplicate argument name in schema: {0}")]
    DuplicateName(ArgumentName),
}

/// Validates a list of specs, stopping at the first problem.
pub fn validate_specs(specs: &[ArgumentSpec]) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let mut seen_flags = HashSet::new();
    let mut seen_names = HashSet::new();

    for spec in specs {
        if !is_valid_flag(spec.flag) {
            errors.push(SchemaError::InvalidFlag(spec.flag.to_string()));
            return errors;
        }
        if !seen_flags.insert(spec.flag) {
            errors.push(SchemaError::DuplicateFlag(spec.flag.to_string()));
            return errors;
        }
        if !seen_names.insert(spec.name) {
            errors.push(SchemaError::DuplicateName(spec.name));
            return errors;
        }
    }

    errors
}

fn is_valid_flag(flag: &str) -> bool {
    flag.len() >= 2 && flag.starts_with('-') && !flag.chars().any(char::is_whitespace)
}
