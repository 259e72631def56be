//! # PMS Core
//!
//! Core business logic for the patient management system.
//!
//! This crate contains pure data operations over a single JSON document:
//! - Patient record validation and BMI/verdict derivation
//! - Whole-collection load/save through the [`PatientStore`] trait
//! - The six patient handlers on [`PatientService`]
//!
//! **No API concerns**: HTTP routing, status codes and CLI parsing belong in `api-rest`,
//! `api-shared` or `pms-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod service;
pub mod store;

pub use config::CoreConfig;
pub use constants::DEFAULT_PATIENT_DATA_FILE;
pub use error::{PatientError, PatientResult};
pub use patient::{Gender, NewPatient, Patient, PatientRecord, PatientUpdate, Verdict};
pub use pms_types::{NonEmptyText, PositiveMeasure};
pub use service::{PatientService, SortField, SortOrder};
pub use store::{JsonFileStore, PatientStore};
