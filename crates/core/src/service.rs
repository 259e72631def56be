//! Patient query and command handlers.
//!
//! Every operation loads the full collection from the [`PatientStore`], works on the
//! in-memory copy with a linear scan, and (for mutations) saves the whole collection
//! back before returning. Failing operations never reach `save`, so the stored
//! collection is left exactly as it was.
//!
//! ## Pure Data Operations
//!
//! This module contains **only** data operations. Status codes, response bodies and
//! other HTTP concerns belong in `api-rest`.

use crate::config::CoreConfig;
use crate::constants::{BMI_KEY, HEIGHT_KEY, WEIGHT_KEY};
use crate::patient::{numeric_field, record_id, NewPatient, Patient, PatientRecord, PatientUpdate};
use crate::store::{JsonFileStore, PatientStore};
use crate::{PatientError, PatientResult};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// SORT PARAMETERS
// ============================================================================

/// Numeric field a sorted view can be ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Height, SortField::Weight, SortField::Bmi];

    pub fn key(self) -> &'static str {
        match self {
            SortField::Height => HEIGHT_KEY,
            SortField::Weight => WEIGHT_KEY,
            SortField::Bmi => BMI_KEY,
        }
    }
}

impl FromStr for SortField {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.key() == s)
            .ok_or_else(|| {
                PatientError::InvalidArgument(format!(
                    "invalid field name choose from {}",
                    quoted_list(SortField::ALL.map(SortField::key))
                ))
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Asc, SortOrder::Desc];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| {
                PatientError::InvalidArgument(format!(
                    "invalid order choose from {}",
                    quoted_list(SortOrder::ALL.map(SortOrder::as_str))
                ))
            })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders `['a', 'b']`, the form clients already match on in error details.
fn quoted_list<const N: usize>(items: [&str; N]) -> String {
    let inner: Vec<String> = items.iter().map(|i| format!("'{i}'")).collect();
    format!("[{}]", inner.join(", "))
}

// ============================================================================
// PATIENT SERVICE
// ============================================================================

/// Stateless handlers over a shared [`PatientStore`].
#[derive(Clone)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Builds a service over the JSON file named in `cfg`.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(Arc::new(JsonFileStore::from_config(cfg)))
    }

    /// Returns the full collection as stored.
    pub fn list(&self) -> PatientResult<Vec<PatientRecord>> {
        self.store.load()
    }

    /// Returns the first record whose `patient_id` matches.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no record matches.
    pub fn get(&self, patient_id: &str) -> PatientResult<PatientRecord> {
        self.store
            .load()?
            .into_iter()
            .find(|p| record_id(p) == Some(patient_id))
            .ok_or_else(|| PatientError::NotFound(patient_id.to_string()))
    }

    /// Parses the raw sort parameters, then returns a sorted view of the collection.
    ///
    /// The parameters are checked before the store is touched, so a bad request never
    /// turns into a persistence error.
    pub fn sort(&self, sort_by: &str, order: &str) -> PatientResult<Vec<PatientRecord>> {
        let field: SortField = sort_by.parse()?;
        let order: SortOrder = order.parse()?;
        self.sorted(field, order)
    }

    /// Returns the collection ordered by `field`. Nothing is persisted.
    ///
    /// The sort is stable in both directions: records with equal keys keep their stored
    /// order. A missing or non-numeric field sorts as `0`.
    pub fn sorted(&self, field: SortField, order: SortOrder) -> PatientResult<Vec<PatientRecord>> {
        let mut records = self.store.load()?;
        let key = field.key();

        match order {
            SortOrder::Asc => records
                .sort_by(|a, b| numeric_field(a, key).total_cmp(&numeric_field(b, key))),
            SortOrder::Desc => records
                .sort_by(|a, b| numeric_field(b, key).total_cmp(&numeric_field(a, key))),
        }

        tracing::debug!("sorted {} patients by {} {}", records.len(), key, order);
        Ok(records)
    }

    /// Appends a new patient, with `bmi` and `verdict` derived from the payload.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::AlreadyExists` if the id is already present, or
    /// `PatientError::Validation` if the measurements give a non-finite BMI. The stored
    /// collection is then left untouched.
    pub fn create(&self, new_patient: NewPatient) -> PatientResult<Patient> {
        let mut records = self.store.load()?;
        let patient_id = new_patient.patient_id.as_str();

        if records.iter().any(|p| record_id(p) == Some(patient_id)) {
            return Err(PatientError::AlreadyExists(patient_id.to_string()));
        }

        let patient = Patient::try_from(new_patient)?;
        records.push(patient.clone().into_record());
        self.store.save(&records)?;

        tracing::info!(
            "created patient {} (bmi {}, {:?})",
            patient.patient_id,
            patient.bmi,
            patient.verdict
        );
        Ok(patient)
    }

    /// Overwrites the supplied fields of an existing patient and returns the stored
    /// result. Derived fields are not recomputed. An empty update only checks that the
    /// patient exists; the document is not rewritten.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no record matches.
    pub fn update(&self, patient_id: &str, update: &PatientUpdate) -> PatientResult<PatientRecord> {
        let mut records = self.store.load()?;

        let record = records
            .iter_mut()
            .find(|p| record_id(p) == Some(patient_id))
            .ok_or_else(|| PatientError::NotFound(patient_id.to_string()))?;
        if update.is_empty() {
            tracing::debug!("empty update for patient {}, nothing to save", patient_id);
            return Ok(record.clone());
        }
        update.apply_to(record);
        let updated = record.clone();

        self.store.save(&records)?;

        tracing::info!("updated patient {}", patient_id);
        Ok(updated)
    }

    /// Removes the first patient whose id matches and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::NotFound` if no record matches.
    pub fn delete(&self, patient_id: &str) -> PatientResult<PatientRecord> {
        let mut records = self.store.load()?;

        let index = records
            .iter()
            .position(|p| record_id(p) == Some(patient_id))
            .ok_or_else(|| PatientError::NotFound(patient_id.to_string()))?;
        let removed = records.remove(index);

        self.store.save(&records)?;

        tracing::info!("deleted patient {}", patient_id);
        Ok(removed)
    }
}
