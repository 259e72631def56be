//! Whole-collection persistence.
//!
//! The patient collection lives in a single JSON document holding an array of objects.
//! Every operation reads the entire document and, when it mutates, writes the entire
//! document back. There is no locking, no journaling and no partial I/O: two writers
//! racing on the same file will see the last save win over the whole collection.

use crate::config::CoreConfig;
use crate::constants::EMPTY_COLLECTION;
use crate::patient::PatientRecord;
use crate::{PatientError, PatientResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Load/save of the full patient collection.
///
/// Handlers only ever talk to this trait, so a per-record or transactional backend can
/// replace [`JsonFileStore`] without touching them.
pub trait PatientStore: Send + Sync {
    /// Reads every stored record, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the document is missing, unreadable, or not an
    /// array of objects.
    fn load(&self) -> PatientResult<Vec<PatientRecord>>;

    /// Replaces the stored collection with `records`.
    fn save(&self, records: &[PatientRecord]) -> PatientResult<()>;
}

/// A [`PatientStore`] backed by one JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(cfg.patient_data_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty collection document if none exists yet.
    ///
    /// Returns `true` if a new document was written, `false` if one was already present.
    /// An existing document is never overwritten.
    pub fn initialise(&self) -> PatientResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PatientError::FileWrite)?;
        }
        fs::write(&self.path, EMPTY_COLLECTION).map_err(PatientError::FileWrite)?;

        tracing::info!("initialised empty patient file: {}", self.path.display());
        Ok(true)
    }
}

impl PatientStore for JsonFileStore {
    fn load(&self) -> PatientResult<Vec<PatientRecord>> {
        let contents = fs::read_to_string(&self.path).map_err(PatientError::FileRead)?;
        let document: Value =
            serde_json::from_str(&contents).map_err(PatientError::Deserialization)?;

        let Value::Array(items) = document else {
            return Err(PatientError::InvalidDocument);
        };
        let records = items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(PatientError::InvalidDocument),
            })
            .collect::<PatientResult<Vec<PatientRecord>>>()?;

        tracing::debug!(
            "loaded {} patients from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    fn save(&self, records: &[PatientRecord]) -> PatientResult<()> {
        let contents = serde_json::to_string(records).map_err(PatientError::Serialization)?;
        fs::write(&self.path, contents).map_err(PatientError::FileWrite)?;

        tracing::debug!("saved {} patients to {}", records.len(), self.path.display());
        Ok(())
    }
}
