//! JSON persistence for the medication list and today's doses.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::Result;
use crate::manager::MedicationManager;
use crate::model::{DailyList, Medication};

/// Reads and writes the two JSON data files.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use medtrack_db::JsonStore;
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = JsonStore::new(dir.path().join("meds.json"), dir.path().join("daily.json"));
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// let manager = store.load(today).unwrap();
/// assert!(manager.is_empty());
/// store.save(&manager).unwrap();
/// assert!(dir.path().join("meds.json").exists());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    medication_path: PathBuf,
    daily_path: PathBuf,
}

impl JsonStore {
    /// Creates a store over two explicit file paths.
    pub fn new(medication_path: impl Into<PathBuf>, daily_path: impl Into<PathBuf>) -> Self {
        Self {
            medication_path: medication_path.into(),
            daily_path: daily_path.into(),
        }
    }

    /// Creates a store using the paths from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.medication_path(), config.daily_path())
    }

    /// Path of the medication list.
    pub fn medication_path(&self) -> &Path {
        &self.medication_path
    }

    /// Path of today's dose list.
    pub fn daily_path(&self) -> &Path {
        &self.daily_path
    }

    /// Loads the manager, treating missing files as empty.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DatabaseError::IoError) for unreadable
    /// files or [`JsonError`](crate::DatabaseError::JsonError) for malformed
    /// content.
    pub fn load(&self, today: NaiveDate) -> Result<MedicationManager> {
        let medications: Vec<Medication> = read_json(&self.medication_path)?.unwrap_or_default();
        let daily: Option<DailyList> = read_json(&self.daily_path)?;
        info!(
            count = medications.len(),
            path = %self.medication_path.display(),
            "loaded medications"
        );
        Ok(MedicationManager::from_parts(medications, daily, today))
    }

    /// Writes both files, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DatabaseError::IoError) or
    /// [`JsonError`](crate::DatabaseError::JsonError) on failure.
    pub fn save(&self, manager: &MedicationManager) -> Result<()> {
        write_json(&self.medication_path, manager.medications())?;
        write_json(&self.daily_path, manager.daily())?;
        debug!(path = %self.medication_path.display(), "saved medications");
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "data file missing, starting empty");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(Some(value))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
