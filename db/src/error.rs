//! Error types for medication storage and domain rules.
//!
//! Provides a unified error type covering file I/O, serialization, value
//! conversion and the medication rules enforced by
//! [`MedicationManager`](crate::MedicationManager).

use thiserror::Error;

use crate::TimeOfDay;

/// Errors that can occur while managing medications.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A required field was not supplied.
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    /// A field value could not be converted.
    #[error("invalid {field}: {value}")]
    InvalidValue {
        /// Field being converted.
        field: &'static str,
        /// Rejected input.
        value: String,
    },

    /// A date was not in `yyyy-MM-dd` form.
    #[error("invalid date '{0}': expected yyyy-MM-dd")]
    InvalidDate(String),

    /// A 1-based index outside the displayed list.
    #[error("index {index} is out of range (1 to {len})")]
    IndexOutOfRange {
        /// Index supplied by the user.
        index: usize,
        /// Current list length.
        len: usize,
    },

    /// More than one time of day was selected.
    #[error("select at most one of morning, afternoon or evening")]
    ConflictingTimeOfDay,

    /// A medication with this name already exists.
    #[error("medication already exists: {0}")]
    DuplicateMedication(String),

    /// The dose was already marked as taken.
    #[error("{name} ({period}) was already taken today")]
    AlreadyTaken {
        /// Medication name.
        name: String,
        /// Dose period.
        period: TimeOfDay,
    },

    /// The dose was not marked as taken.
    #[error("{name} ({period}) has not been taken today")]
    NotTaken {
        /// Medication name.
        name: String,
        /// Dose period.
        period: TimeOfDay,
    },

    /// Not enough stock left for the dose.
    #[error("not enough {name} left: {available} available, {required} required")]
    InsufficientQuantity {
        /// Medication name.
        name: String,
        /// Quantity in stock.
        available: f64,
        /// Dosage to take.
        required: f64,
    },

    /// The medication expired before today.
    #[error("{name} expired on {expiration}")]
    Expired {
        /// Medication name.
        name: String,
        /// Expiration date.
        expiration: chrono::NaiveDate,
    },

    /// A daily entry refers to a medication that no longer exists.
    #[error("medication not found: {0}")]
    MedicationNotFound(String),

    /// A search was run without any criteria.
    #[error("search needs at least one criterion")]
    EmptySearch,
}

/// Convenience alias for results with [`DatabaseError`].
pub type Result<T> = std::result::Result<T, DatabaseError>;
