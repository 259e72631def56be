use pms_types::{MeasureError, TextError};

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("{0}")]
    Validation(String),
    #[error("Patient Already Exist")]
    AlreadyExists(String),
    #[error("Patient Not Found")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),

    #[error("failed to read patient file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write patient file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize patients: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize patients: {0}")]
    Deserialization(serde_json::Error),
    #[error("patient file is not an array of objects")]
    InvalidDocument,
}

impl PatientError {
    /// True for failures of the backing document rather than of the request.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            PatientError::FileRead(_)
                | PatientError::FileWrite(_)
                | PatientError::Serialization(_)
                | PatientError::Deserialization(_)
                | PatientError::InvalidDocument
        )
    }
}

impl From<TextError> for PatientError {
    fn from(err: TextError) -> Self {
        PatientError::Validation(format!("patient_id: {err}"))
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

/// Tags a measurement error with the field it came from.
pub(crate) fn measure_error(field: &str, err: MeasureError) -> PatientError {
    PatientError::Validation(format!("{field}: {err}"))
}
