use clap::{Parser, Subcommand};
use pms_core::{
    config::patient_data_file_from_env_value, CoreConfig, JsonFileStore, NewPatient,
    PatientRecord, PatientService, PatientUpdate,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pms")]
#[command(about = "Patient management system CLI")]
struct Cli {
    /// Patient JSON file (defaults to $PATIENT_DATA_FILE, then patient.json)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty patient file if none exists
    Init,
    /// List all patients
    List,
    /// Show one patient
    Get {
        /// Patient id
        patient_id: String,
    },
    /// List patients sorted by height, weight or bmi
    Sort {
        /// Field to sort on (height, weight, bmi)
        sort_by: String,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },
    /// Create a patient
    Create {
        /// Patient id, must be unique
        patient_id: String,
        /// male, female or others
        gender: String,
        /// Height in cm
        height: f64,
        /// Weight in kg
        weight: f64,
    },
    /// Overwrite some fields of a patient
    Update {
        /// Patient id
        patient_id: String,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
    },
    /// Delete a patient
    Delete {
        /// Patient id
        patient_id: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let file = resolve_file(cli.file, std::env::var("PATIENT_DATA_FILE").ok());
    run(file, cli.command)
}

/// `--file` wins over `$PATIENT_DATA_FILE`, which wins over the default file name.
fn resolve_file(flag: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    flag.unwrap_or_else(|| patient_data_file_from_env_value(env_value))
}

fn run(file: PathBuf, command: Option<Commands>) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = CoreConfig::new(file)?;
    let service = PatientService::from_config(&cfg);

    match command {
        Some(Commands::Init) => {
            let store = JsonFileStore::from_config(&cfg);
            if store.initialise()? {
                println!("Initialised {}", store.path().display());
            } else {
                println!("{} already exists", store.path().display());
            }
        }
        Some(Commands::List) => {
            let patients = service.list()?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                print_records(&patients)?;
            }
        }
        Some(Commands::Get { patient_id }) => {
            let patient = service.get(&patient_id)?;
            println!("{}", serde_json::to_string_pretty(&patient)?);
        }
        Some(Commands::Sort { sort_by, order }) => {
            print_records(&service.sort(&sort_by, &order)?)?;
        }
        Some(Commands::Create {
            patient_id,
            gender,
            height,
            weight,
        }) => {
            let patient = service.create(NewPatient::new(patient_id, &gender, height, weight)?)?;
            println!(
                "Created patient {} (bmi {}, {:?})",
                patient.patient_id, patient.bmi, patient.verdict
            );
        }
        Some(Commands::Update {
            patient_id,
            gender,
            height,
            weight,
        }) => {
            let update = PatientUpdate::new(gender.as_deref(), height, weight)?;
            let patient = service.update(&patient_id, &update)?;
            println!("{}", serde_json::to_string_pretty(&patient)?);
        }
        Some(Commands::Delete { patient_id }) => {
            service.delete(&patient_id)?;
            println!("Deleted patient {}", patient_id);
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn print_records(records: &[PatientRecord]) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(records)?);
    Ok(())
}
