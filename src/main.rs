use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pms_core::{config::patient_data_file_from_env_value, CoreConfig, PatientService};

/// Main entry point for the patient management service
///
/// Starts the REST server on the configured address.
///
/// # Environment Variables
/// - `PMS_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `PATIENT_DATA_FILE`: JSON document holding the patient collection (default: "patient.json")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, binding or the server itself fails
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the patient data file does not exist,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pms_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("pms_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("PMS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());

    let patient_data_file =
        patient_data_file_from_env_value(std::env::var("PATIENT_DATA_FILE").ok());
    if !patient_data_file.is_file() {
        anyhow::bail!(
            "Patient data file does not exist: {} (create it with `pms init`)",
            patient_data_file.display()
        );
    }
    let cfg = CoreConfig::new(patient_data_file)?;

    tracing::info!("++ Starting patient REST API on {}", rest_addr);
    tracing::info!("++ Patient data file: {}", cfg.patient_data_file().display());

    api_rest::serve(PatientService::from_config(&cfg), &rest_addr).await
}
