//! Constants used throughout the core crate.

/// Default path of the JSON document holding the patient collection.
pub const DEFAULT_PATIENT_DATA_FILE: &str = "patient.json";

/// Contents written by `JsonFileStore::initialise` for a new, empty collection.
pub const EMPTY_COLLECTION: &str = "[]";

/// Record keys, as persisted.
pub const PATIENT_ID_KEY: &str = "patient_id";
pub const GENDER_KEY: &str = "gender";
pub const HEIGHT_KEY: &str = "height";
pub const WEIGHT_KEY: &str = "weight";
pub const BMI_KEY: &str = "bmi";
pub const VERDICT_KEY: &str = "verdict";

/// Verdict thresholds. Anything at or above `OBESE_BMI` is obese.
pub const UNDERWEIGHT_BELOW_BMI: f64 = 18.5;
pub const OBESE_BMI: f64 = 30.0;
