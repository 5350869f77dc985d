mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dental_records_core::config::{
    DEFAULT_PATIENTS_KEY, DEFAULT_REVENUE_PER_PATIENT, DEFAULT_VISITS_KEY,
};
use dental_records_core::{DentalOffice, OfficeConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{PatientAction, VisitAction};

#[derive(Parser)]
#[command(name = "dental-records")]
#[command(about = "Patient registry and visit ledger for a small dental office")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "DENTAL_RECORDS_DB", default_value = "dental-records.db")]
    db: PathBuf,

    /// Do not install sample records into empty collections
    #[arg(long, env = "DENTAL_RECORDS_NO_SEED")]
    no_seed: bool,

    /// Symbol printed in front of amounts
    #[arg(long, env = "DENTAL_RECORDS_CURRENCY", default_value = "$")]
    currency: String,

    /// Simulated monthly revenue per active patient
    #[arg(long, env = "DENTAL_RECORDS_REVENUE_PER_PATIENT", default_value_t = DEFAULT_REVENUE_PER_PATIENT)]
    revenue_per_patient: f64,

    /// Storage key of the patient registry
    #[arg(long, env = "DENTAL_RECORDS_PATIENTS_KEY", default_value = DEFAULT_PATIENTS_KEY)]
    patients_key: String,

    /// Storage key of the visit ledger
    #[arg(long, env = "DENTAL_RECORDS_VISITS_KEY", default_value = DEFAULT_VISITS_KEY)]
    visits_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the patient registry
    Patients {
        #[command(subcommand)]
        action: PatientAction,
    },
    /// Manage the visit ledger
    Visits {
        #[command(subcommand)]
        action: VisitAction,
    },
    /// Show the stored collections
    Status,
}

fn office_config(cli: &Cli) -> anyhow::Result<OfficeConfig> {
    let config = OfficeConfig::new(&cli.patients_key, &cli.visits_key)?
        .with_database_path(&cli.db)
        .with_seed_on_first_run(!cli.no_seed)
        .with_currency_symbol(cli.currency.as_str())
        .with_revenue_per_patient(cli.revenue_per_patient)?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries tables and exports.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = office_config(&cli)?;
    let db = config
        .open_database()
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;
    let mut office = DentalOffice::open(config, db).context("failed to load records")?;

    match cli.command {
        Commands::Patients { action } => commands::run_patients(&mut office, action),
        Commands::Visits { action } => commands::run_visits(&mut office, action),
        Commands::Status => commands::run_status(&office),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_flags() {
        let cli = Cli::try_parse_from([
            "dental-records",
            "--db",
            "office.db",
            "--no-seed",
            "--revenue-per-patient",
            "90",
            "--patients-key",
            "clinicPatients",
            "status",
        ])
        .unwrap();
        let config = office_config(&cli).unwrap();

        assert_eq!(config.revenue_per_patient(), 90.0);
        assert_eq!(config.patients_key(), "clinicPatients");
        assert_eq!(config.visits_key(), "dentalVisits");
        assert!(!config.seed_on_first_run());
        assert_eq!(config.database_path(), Some(std::path::Path::new("office.db")));
    }

    #[test]
    fn test_bad_config_rejected() {
        let negative = Cli::try_parse_from([
            "dental-records",
            "--revenue-per-patient=-5",
            "status",
        ])
        .unwrap();
        assert!(office_config(&negative).is_err());

        let same_keys = Cli::try_parse_from([
            "dental-records",
            "--patients-key",
            "records",
            "--visits-key",
            "records",
            "status",
        ])
        .unwrap();
        assert!(office_config(&same_keys).is_err());
    }
}
