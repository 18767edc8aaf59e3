//! Application configuration.
//!
//! Defines the YAML-serializable settings for where medication data lives,
//! how the clock maps onto dose periods, and the interactive prompt. Every
//! field has a default, so a config file only needs the values it changes.
//!
//! # Example YAML
//!
//! ```yaml
//! data_dir: ~/.local/share/medtrack
//! medication_file: medications.json
//! daily_file: daily.json
//! morning_end_hour: 11
//! afternoon_end_hour: 17
//! prompt: "meds> "
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatabaseError, Result};
use crate::model::TimeOfDay;

/// Top-level medtrack configuration.
///
/// # Examples
///
/// ```
/// use medtrack_db::{AppConfig, TimeOfDay};
///
/// let config: AppConfig = serde_yaml::from_str("morning_end_hour: 10").unwrap();
/// assert_eq!(config.afternoon_end_hour, 18);
/// assert_eq!(config.time_of_day(10), TimeOfDay::Afternoon);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the data files.
    pub data_dir: PathBuf,
    /// File name of the medication list inside `data_dir`.
    pub medication_file: String,
    /// File name of today's dose list inside `data_dir`.
    pub daily_file: String,
    /// First hour (0-23) that is no longer morning.
    pub morning_end_hour: u32,
    /// First hour (0-23) that is evening.
    pub afternoon_end_hour: u32,
    /// Prompt printed before each line.
    pub prompt: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            medication_file: "medications.json".to_string(),
            daily_file: "daily.json".to_string(),
            morning_end_hour: 12,
            afternoon_end_hour: 18,
            prompt: "> ".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](DatabaseError::IoError) if the file cannot be
    /// read, [`YamlError`](DatabaseError::YamlError) if parsing fails, or
    /// [`InvalidValue`](DatabaseError::InvalidValue) for out-of-order hours.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.check_hours()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](DatabaseError::IoError) if the file cannot be
    /// written, or [`YamlError`](DatabaseError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Full path of the medication list.
    pub fn medication_path(&self) -> PathBuf {
        self.data_dir.join(&self.medication_file)
    }

    /// Full path of today's dose list.
    pub fn daily_path(&self) -> PathBuf {
        self.data_dir.join(&self.daily_file)
    }

    /// Classifies an hour of the day using the configured cut-offs.
    pub fn time_of_day(&self, hour: u32) -> TimeOfDay {
        TimeOfDay::from_hour(hour, self.morning_end_hour, self.afternoon_end_hour)
    }

    fn check_hours(&self) -> Result<()> {
        if self.morning_end_hour > self.afternoon_end_hour || self.afternoon_end_hour > 24 {
            return Err(DatabaseError::InvalidValue {
                field: "hours",
                value: format!("{}..{}", self.morning_end_hour, self.afternoon_end_hour),
            });
        }
        Ok(())
    }
}
