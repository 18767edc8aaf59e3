//! Medication model, daily dose tracking and storage for medtrack.
//!
//! This crate owns everything below the command line: the [`Medication`]
//! model and its conversion from user-typed values, the
//! [`MedicationManager`] that enforces the dose rules, JSON persistence
//! through [`JsonStore`], and the YAML [`AppConfig`].
//!
//! # Quick start
//!
//! ```no_run
//! use chrono::Local;
//! use medtrack_db::{AppConfig, JsonStore};
//!
//! let config = AppConfig::load("medtrack.yml").unwrap_or_default();
//! let store = JsonStore::from_config(&config);
//!
//! let mut manager = store.load(Local::now().date_naive()).unwrap();
//! for (index, medication) in manager.medications().iter().enumerate() {
//!     println!("{}. {medication}", index + 1);
//! }
//! let period = config.time_of_day(9);
//! manager.take(1, period).unwrap();
//! store.save(&manager).unwrap();
//! ```

mod config;
mod error;
mod manager;
mod model;
mod store;

pub use config::AppConfig;
pub use error::{DatabaseError, Result};
pub use manager::{MedicationManager, SearchCriteria};
pub use model::{
    DATE_FORMAT, DailyList, DailyMedication, Medication, MedicationDraft, TimeOfDay,
    format_amount, parse_date, parse_index,
};
pub use store::JsonStore;
