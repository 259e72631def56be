//! Validated primitive types shared across the patient management crates.
//!
//! These wrap plain strings and floats so that an invalid patient id or a
//! non-positive body measurement cannot be constructed in the first place.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Errors that can occur when creating a body measurement.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MeasureError {
    #[error("value must be greater than 0, got {0}")]
    NotPositive(f64),
    #[error("value must be a finite number")]
    NotFinite,
}

/// A string type that guarantees non-blank content.
///
/// Unlike a trimmed identifier, the original text is kept exactly as supplied so that
/// lookups by path parameter compare against the same bytes the caller stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the input contains at least one non-whitespace
    /// character, or `Err(TextError::Empty)` otherwise.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(s).map_err(serde::de::Error::custom)
    }
}

/// A strictly positive, finite body measurement (height in cm, weight in kg).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct PositiveMeasure(f64);

impl PositiveMeasure {
    /// Creates a new measurement, rejecting zero, negative, NaN and infinite values.
    pub fn new(value: f64) -> Result<Self, MeasureError> {
        if !value.is_finite() {
            return Err(MeasureError::NotFinite);
        }
        if value <= 0.0 {
            return Err(MeasureError::NotPositive(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl serde::Serialize for PositiveMeasure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PositiveMeasure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        PositiveMeasure::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_rejects_blank_input() {
        assert!(matches!(NonEmptyText::new(""), Err(TextError::Empty)));
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn non_empty_text_keeps_input_verbatim() {
        let text = NonEmptyText::new(" P001 ").expect("should accept padded id");
        assert_eq!(text.as_str(), " P001 ");
    }

    #[test]
    fn positive_measure_rejects_zero_negative_and_nan() {
        assert_eq!(PositiveMeasure::new(0.0), Err(MeasureError::NotPositive(0.0)));
        assert_eq!(
            PositiveMeasure::new(-1.5),
            Err(MeasureError::NotPositive(-1.5))
        );
        assert_eq!(PositiveMeasure::new(f64::NAN), Err(MeasureError::NotFinite));
        assert_eq!(
            PositiveMeasure::new(f64::INFINITY),
            Err(MeasureError::NotFinite)
        );
    }

    #[test]
    fn positive_measure_deserialises_integers_and_floats() {
        let m: PositiveMeasure = serde_json::from_str("150").expect("integer height");
        assert_eq!(m.get(), 150.0);
        let m: PositiveMeasure = serde_json::from_str("72.5").expect("float weight");
        assert_eq!(m.get(), 72.5);
    }

    #[test]
    fn positive_measure_deserialise_rejects_zero() {
        let err = serde_json::from_str::<PositiveMeasure>("0").expect_err("zero is invalid");
        assert!(err.to_string().contains("greater than 0"));
    }
}
