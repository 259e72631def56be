//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads environment variables.

use crate::constants::DEFAULT_PATIENT_DATA_FILE;
use crate::{PatientError, PatientResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_file: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(patient_data_file: PathBuf) -> PatientResult<Self> {
        if patient_data_file.as_os_str().is_empty() {
            return Err(PatientError::InvalidArgument(
                "patient data file path cannot be empty".into(),
            ));
        }

        Ok(Self { patient_data_file })
    }

    pub fn patient_data_file(&self) -> &Path {
        &self.patient_data_file
    }
}

/// Resolve the patient data file from an optional (environment) value.
///
/// If `value` is `None` or empty/whitespace, the default `patient.json` in the
/// working directory is used.
pub fn patient_data_file_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PATIENT_DATA_FILE))
}
