use biopanel_core::{
    wire::Status, CoreConfig, MetricKind, PatientId, PatientService, RecordQueryService,
    RecordRepository, ValueSimulator,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "biopanel")]
#[command(about = "Biopanel patient biomarker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the measurement templates
    Templates {
        /// biomarkers or biotrackers
        #[arg(long, default_value = "biomarkers")]
        kind: MetricKind,
    },
    /// List demo patients
    Patients,
    /// Print a patient's seeded records as JSON
    Records {
        /// Patient identifier
        patient_id: PatientId,
        /// Category filter (case-insensitive)
        #[arg(long)]
        category: Option<String>,
        /// biomarkers or biotrackers
        #[arg(long, default_value = "biomarkers")]
        kind: MetricKind,
    },
    /// Run the value simulator for a number of ticks
    Simulate {
        /// Number of ticks to run
        #[arg(long, default_value_t = 10)]
        ticks: u32,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Print this patient's records as JSON after the run
        #[arg(long)]
        patient: Option<PatientId>,
        /// biomarkers or biotrackers
        #[arg(long, default_value = "biomarkers")]
        kind: MetricKind,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = CoreConfig::from_process_env()?;

    match cli.command {
        Some(Commands::Templates { kind }) => {
            for template in kind.catalog().templates() {
                println!(
                    "{} [{}] {} - {} {}",
                    template.name,
                    template.category,
                    template.reference_range.min,
                    template.reference_range.max,
                    template.unit
                );
            }
        }
        Some(Commands::Patients) => {
            for patient in PatientService::new().list_patients() {
                println!(
                    "ID: {}, Name: {}, Born: {}, Last visit: {}",
                    patient.id, patient.name, patient.date_of_birth, patient.last_visit
                );
            }
        }
        Some(Commands::Records {
            patient_id,
            category,
            kind,
        }) => {
            let repository = RecordRepository::seeded(&kind.catalog(), cfg.patient_ids());
            let query = RecordQueryService::new(kind, Arc::new(repository));
            let records = query.records_for_patient(patient_id, category.as_deref());
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Some(Commands::Simulate {
            ticks,
            seed,
            patient,
            kind,
        }) => {
            let repository = Arc::new(RecordRepository::seeded(
                &kind.catalog(),
                cfg.patient_ids(),
            ));
            let mut simulator =
                ValueSimulator::with_seed(kind, Arc::clone(&repository), seed.or(cfg.simulator_seed()));

            for tick in 1..=ticks {
                let report = simulator.tick();
                let (normal, high, low) = status_counts(&repository);
                println!(
                    "tick {}: updated {}/{} (normal {}, high {}, low {})",
                    tick, report.updated, report.total, normal, high, low
                );
            }

            if let Some(patient_id) = patient {
                let query = RecordQueryService::new(kind, repository);
                let records = query.records_for_patient(patient_id, None);
                println!("{}", serde_json::to_string_pretty(&records)?);
            }
        }
        None => {
            println!("Use 'biopanel --help' for commands");
        }
    }

    Ok(())
}

fn status_counts(repository: &RecordRepository) -> (usize, usize, usize) {
    repository
        .all()
        .iter()
        .fold((0, 0, 0), |(normal, high, low), r| match r.status() {
            Status::Normal => (normal + 1, high, low),
            Status::High => (normal, high + 1, low),
            Status::Low => (normal, high, low + 1),
        })
}
