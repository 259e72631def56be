//! Patient record model.
//!
//! Responsibilities:
//! - Validate creation payloads into a [`NewPatient`]
//! - Derive `bmi` and `verdict` once, at creation time
//! - Describe partial updates with explicit per-field presence ([`PatientUpdate`])
//! - Provide accessors over raw stored records ([`PatientRecord`])
//!
//! Notes:
//! - BMI divides by the height exactly as stored (centimetres), with no unit conversion.
//!   A 150 cm / 50 kg patient therefore gets a BMI of `0.0`, not ~22.2.
//! - Stored records are opaque JSON objects; nothing here re-validates them on load.

use crate::constants::{
    BMI_KEY, GENDER_KEY, HEIGHT_KEY, OBESE_BMI, PATIENT_ID_KEY, UNDERWEIGHT_BELOW_BMI,
    VERDICT_KEY, WEIGHT_KEY,
};
use crate::error::measure_error;
use crate::{PatientError, PatientResult};
use pms_types::{NonEmptyText, PositiveMeasure};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One stored patient, exactly as it appears in the JSON document.
pub type PatientRecord = serde_json::Map<String, Value>;

// ============================================================================
// Gender and verdict
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Others];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Others => "others",
        }
    }
}

impl FromStr for Gender {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| {
                PatientError::Validation(format!(
                    "gender: input should be 'male', 'female' or 'others', got '{s}'"
                ))
            })
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight-status category derived from BMI.
///
/// There is deliberately no "Overweight" band: 18.5 up to 30 is all `Normal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Underweight,
    Normal,
    Obese,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Obese => "Obese",
        }
    }

    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW_BMI {
            Verdict::Underweight
        } else if bmi < OBESE_BMI {
            Verdict::Normal
        } else {
            Verdict::Obese
        }
    }
}

// ============================================================================
// BMI
// ============================================================================

/// `weight / height^2`, rounded to two decimal places.
///
/// # Errors
///
/// Returns `PatientError::Validation` when the quotient is not a finite number, which
/// happens once `height^2` underflows to zero or the ratio overflows.
pub fn compute_bmi(height: PositiveMeasure, weight: PositiveMeasure) -> PatientResult<f64> {
    let bmi = weight.get() / height.get().powi(2);
    if !bmi.is_finite() {
        return Err(PatientError::Validation(format!(
            "bmi: weight {} / height {}^2 is not a finite number",
            weight.get(),
            height.get()
        )));
    }
    Ok(round_to_two_places(bmi))
}

// Goes through decimal formatting so the result is the correctly rounded value of the
// exact binary quotient, instead of the drift `(x * 100.0).round() / 100.0` can show.
fn round_to_two_places(value: f64) -> f64 {
    format!("{value:.2}")
        .parse()
        .unwrap_or_else(|_| (value * 100.0).round() / 100.0)
}

// ============================================================================
// Creation
// ============================================================================

/// A validated creation payload.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPatient {
    pub patient_id: NonEmptyText,
    pub gender: Gender,
    pub height: PositiveMeasure,
    pub weight: PositiveMeasure,
}

impl NewPatient {
    /// Validates raw creation input.
    ///
    /// # Errors
    ///
    /// Returns `PatientError::Validation` if the id is blank, the gender is not one of
    /// the three accepted values, or either measurement is not strictly positive.
    pub fn new(
        patient_id: impl Into<String>,
        gender: &str,
        height: f64,
        weight: f64,
    ) -> PatientResult<Self> {
        Ok(Self {
            patient_id: NonEmptyText::new(patient_id)?,
            gender: gender.parse()?,
            height: PositiveMeasure::new(height).map_err(|e| measure_error(HEIGHT_KEY, e))?,
            weight: PositiveMeasure::new(weight).map_err(|e| measure_error(WEIGHT_KEY, e))?,
        })
    }
}

/// A full patient record with its derived fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    pub patient_id: NonEmptyText,
    pub gender: Gender,
    pub height: PositiveMeasure,
    pub weight: PositiveMeasure,
    pub bmi: f64,
    pub verdict: Verdict,
}

impl TryFrom<NewPatient> for Patient {
    type Error = PatientError;

    fn try_from(new: NewPatient) -> PatientResult<Self> {
        let bmi = compute_bmi(new.height, new.weight)?;
        Ok(Self {
            patient_id: new.patient_id,
            gender: new.gender,
            height: new.height,
            weight: new.weight,
            bmi,
            verdict: Verdict::from_bmi(bmi),
        })
    }
}

impl Patient {
    /// Converts into the raw object form stored in the collection, keys in storage order.
    pub fn into_record(self) -> PatientRecord {
        let mut record = PatientRecord::new();
        record.insert(PATIENT_ID_KEY.into(), Value::from(self.patient_id.as_str()));
        record.insert(GENDER_KEY.into(), Value::from(self.gender.as_str()));
        record.insert(HEIGHT_KEY.into(), Value::from(self.height.get()));
        record.insert(WEIGHT_KEY.into(), Value::from(self.weight.get()));
        record.insert(BMI_KEY.into(), Value::from(self.bmi));
        record.insert(VERDICT_KEY.into(), Value::from(self.verdict.as_str()));
        record
    }
}

// ============================================================================
// Partial update
// ============================================================================

/// Fields a caller wants to overwrite. `None` means "leave unchanged".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientUpdate {
    pub gender: Option<Gender>,
    pub height: Option<PositiveMeasure>,
    pub weight: Option<PositiveMeasure>,
}

impl PatientUpdate {
    pub fn new(
        gender: Option<&str>,
        height: Option<f64>,
        weight: Option<f64>,
    ) -> PatientResult<Self> {
        Ok(Self {
            gender: gender.map(str::parse::<Gender>).transpose()?,
            height: height
                .map(PositiveMeasure::new)
                .transpose()
                .map_err(|e| measure_error(HEIGHT_KEY, e))?,
            weight: weight
                .map(PositiveMeasure::new)
                .transpose()
                .map_err(|e| measure_error(WEIGHT_KEY, e))?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.gender.is_none() && self.height.is_none() && self.weight.is_none()
    }

    /// Overwrites the supplied keys on `record`. `bmi` and `verdict` are left as they
    /// were computed at creation.
    pub fn apply_to(&self, record: &mut PatientRecord) {
        if let Some(gender) = self.gender {
            record.insert(GENDER_KEY.into(), Value::from(gender.as_str()));
        }
        if let Some(height) = self.height {
            record.insert(HEIGHT_KEY.into(), Value::from(height.get()));
        }
        if let Some(weight) = self.weight {
            record.insert(WEIGHT_KEY.into(), Value::from(weight.get()));
        }
    }
}

// ============================================================================
// Raw record accessors
// ============================================================================

pub fn record_id(record: &PatientRecord) -> Option<&str> {
    record.get(PATIENT_ID_KEY).and_then(Value::as_str)
}

/// Numeric value of `key`, or `0.0` when it is missing or not a number.
pub fn numeric_field(record: &PatientRecord, key: &str) -> f64 {
    record.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure(v: f64) -> PositiveMeasure {
        PositiveMeasure::new(v).unwrap()
    }

    fn bmi(height: f64, weight: f64) -> f64 {
        compute_bmi(measure(height), measure(weight)).expect("finite bmi")
    }

    #[test]
    fn bmi_uses_height_as_stored() {
        // 50 / 150^2 = 0.00222.., which rounds to 0.0. With metres this would be ~22.2.
        let value = bmi(150.0, 50.0);
        assert_eq!(value, 0.0);
        assert_eq!(Verdict::from_bmi(value), Verdict::Underweight);
    }

    #[test]
    fn bmi_is_rounded_to_two_places() {
        assert_eq!(bmi(2.0, 90.0), 22.5);
        assert_eq!(bmi(1.75, 70.0), 22.86);
        assert_eq!(bmi(3.0, 10.0), 1.11);
        assert_eq!(bmi(1.0, 18.499), 18.5);
        assert_eq!(bmi(4.0, 2.0), 0.12);
        assert_eq!(bmi(4.0, 6.0), 0.38);
    }

    #[test]
    fn bmi_rejects_non_finite_quotient() {
        // 1e-200 squared underflows to 0.0, so the division yields infinity.
        let err = compute_bmi(measure(1e-200), measure(50.0)).expect_err("infinite bmi");
        assert!(matches!(err, PatientError::Validation(msg) if msg.starts_with("bmi")));

        let err = compute_bmi(measure(1e-160), measure(1e300)).expect_err("overflowing bmi");
        assert!(matches!(err, PatientError::Validation(_)));

        let new = NewPatient::new("P1", "male", 1e-200, 50.0).unwrap();
        let err = Patient::try_from(new).expect_err("no record for infinite bmi");
        assert!(matches!(err, PatientError::Validation(_)));
    }

    #[test]
    fn very_tall_patient_gets_zero_bmi() {
        // height^2 overflowing to infinity still yields a finite quotient.
        assert_eq!(bmi(1e200, 50.0), 0.0);
    }

    #[test]
    fn verdict_band_boundaries() {
        assert_eq!(Verdict::from_bmi(18.49), Verdict::Underweight);
        assert_eq!(Verdict::from_bmi(18.5), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(24.99), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(25.0), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(29.99), Verdict::Normal);
        assert_eq!(Verdict::from_bmi(30.0), Verdict::Obese);
        assert_eq!(Verdict::from_bmi(45.0), Verdict::Obese);
    }

    #[test]
    fn new_patient_validates_fields() {
        assert!(NewPatient::new("P001", "female", 1.6, 60.0).is_ok());

        let err = NewPatient::new("", "male", 1.6, 60.0).expect_err("blank id");
        assert!(matches!(err, PatientError::Validation(_)));

        let err = NewPatient::new("P001", "unknown", 1.6, 60.0).expect_err("bad gender");
        assert!(matches!(err, PatientError::Validation(msg) if msg.contains("gender")));

        let err = NewPatient::new("P001", "male", 0.0, 60.0).expect_err("zero height");
        assert!(matches!(err, PatientError::Validation(msg) if msg.starts_with("height")));

        let err = NewPatient::new("P001", "male", 1.6, -3.0).expect_err("negative weight");
        assert!(matches!(err, PatientError::Validation(msg) if msg.starts_with("weight")));
    }

    #[test]
    fn patient_record_has_derived_fields() {
        let new = NewPatient::new("P002", "others", 2.0, 130.0).unwrap();
        let record = Patient::try_from(new).expect("finite bmi").into_record();

        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["patient_id", "gender", "height", "weight", "bmi", "verdict"]
        );
        assert_eq!(record["patient_id"], "P002");
        assert_eq!(record["gender"], "others");
        assert_eq!(record["bmi"], 32.5);
        assert_eq!(record["verdict"], "Obese");
    }

    #[test]
    fn update_overwrites_only_supplied_fields() {
        let mut record = Patient::try_from(NewPatient::new("P003", "male", 2.0, 80.0).unwrap())
            .unwrap()
            .into_record();
        let before = record.clone();

        PatientUpdate::default().apply_to(&mut record);
        assert_eq!(record, before);

        let update = PatientUpdate::new(None, None, Some(200.0)).unwrap();
        update.apply_to(&mut record);
        assert_eq!(record["weight"], 200.0);
        assert_eq!(record["height"], before["height"]);
        assert_eq!(record["gender"], before["gender"]);
        // Derived fields stay frozen at their creation values.
        assert_eq!(record["bmi"], before["bmi"]);
        assert_eq!(record["verdict"], "Normal");
    }

    #[test]
    fn update_rejects_non_positive_measurements() {
        let err = PatientUpdate::new(None, Some(0.0), None).expect_err("zero height");
        assert!(matches!(err, PatientError::Validation(_)));
        let err = PatientUpdate::new(Some("robot"), None, None).expect_err("bad gender");
        assert!(matches!(err, PatientError::Validation(_)));
    }

    #[test]
    fn numeric_field_defaults_to_zero() {
        let mut record = PatientRecord::new();
        record.insert("height".into(), Value::from(170));
        record.insert("weight".into(), Value::from("heavy"));
        assert_eq!(numeric_field(&record, "height"), 170.0);
        assert_eq!(numeric_field(&record, "weight"), 0.0);
        assert_eq!(numeric_field(&record, "bmi"), 0.0);
    }
}
