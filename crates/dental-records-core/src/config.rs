//! Office configuration.
//!
//! Resolved once at startup by the front end and passed into the office.
//! Nothing in the core reads environment variables.

use std::path::{Path, PathBuf};

use crate::db::{Database, DbResult};
use crate::error::{CoreError, CoreResult};

/// Storage key of the patient registry (matches the browser storage key).
pub const DEFAULT_PATIENTS_KEY: &str = "dentalPatients";
/// Storage key of the visit ledger.
pub const DEFAULT_VISITS_KEY: &str = "dentalVisits";
/// Simulated average monthly revenue per patient.
pub const DEFAULT_REVENUE_PER_PATIENT: f64 = 150.0;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

/// Configuration for a [`DentalOffice`](crate::office::DentalOffice).
#[derive(Clone, Debug, PartialEq)]
pub struct OfficeConfig {
    database_path: Option<PathBuf>,
    patients_key: String,
    visits_key: String,
    revenue_per_patient: f64,
    currency_symbol: String,
    seed_on_first_run: bool,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            patients_key: DEFAULT_PATIENTS_KEY.to_string(),
            visits_key: DEFAULT_VISITS_KEY.to_string(),
            revenue_per_patient: DEFAULT_REVENUE_PER_PATIENT,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            seed_on_first_run: true,
        }
    }
}

impl OfficeConfig {
    /// Create a config with custom storage keys.
    ///
    /// Keys must be non-blank and distinct, since the two collections are
    /// stored independently.
    pub fn new(patients_key: &str, visits_key: &str) -> CoreResult<Self> {
        let patients_key = patients_key.trim();
        let visits_key = visits_key.trim();

        if patients_key.is_empty() || visits_key.is_empty() {
            return Err(CoreError::Config("storage keys cannot be empty".into()));
        }
        if patients_key == visits_key {
            return Err(CoreError::Config(format!(
                "patients and visits must use different storage keys, both are {}",
                patients_key
            )));
        }

        Ok(Self {
            patients_key: patients_key.to_string(),
            visits_key: visits_key.to_string(),
            ..Self::default()
        })
    }

    /// Store collections in a SQLite file instead of memory.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    pub fn with_revenue_per_patient(mut self, amount: f64) -> CoreResult<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::Config(format!(
                "revenue per patient must be a non-negative amount, got {}",
                amount
            )));
        }
        self.revenue_per_patient = amount;
        Ok(self)
    }

    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    pub fn with_seed_on_first_run(mut self, seed: bool) -> Self {
        self.seed_on_first_run = seed;
        self
    }

    pub fn database_path(&self) -> Option<&Path> {
        self.database_path.as_deref()
    }

    pub fn patients_key(&self) -> &str {
        &self.patients_key
    }

    pub fn visits_key(&self) -> &str {
        &self.visits_key
    }

    pub fn revenue_per_patient(&self) -> f64 {
        self.revenue_per_patient
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    pub fn seed_on_first_run(&self) -> bool {
        self.seed_on_first_run
    }

    /// Open the configured SQLite store (in memory without a path).
    pub fn open_database(&self) -> DbResult<Database> {
        match &self.database_path {
            Some(path) => Database::open(path),
            None => Database::open_in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OfficeConfig::default();
        assert_eq!(config.patients_key(), "dentalPatients");
        assert_eq!(config.visits_key(), "dentalVisits");
        assert_eq!(config.revenue_per_patient(), 150.0);
        assert!(config.seed_on_first_run());
        assert!(config.database_path().is_none());
    }

    #[test]
    fn test_keys_must_differ() {
        assert!(matches!(
            OfficeConfig::new("records", "records"),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(OfficeConfig::new(" ", "v"), Err(CoreError::Config(_))));
        assert!(OfficeConfig::new("p", "v").is_ok());
    }

    #[test]
    fn test_revenue_must_be_non_negative() {
        assert!(OfficeConfig::default().with_revenue_per_patient(-1.0).is_err());
        let config = OfficeConfig::default().with_revenue_per_patient(99.5).unwrap();
        assert_eq!(config.revenue_per_patient(), 99.5);
    }

    #[test]
    fn test_builders() {
        let config = OfficeConfig::default()
            .with_currency_symbol("€")
            .with_seed_on_first_run(false);
        assert_eq!(config.currency_symbol(), "€");
        assert!(!config.seed_on_first_run());
    }

    #[test]
    fn test_open_database_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = OfficeConfig::default().with_database_path(dir.path().join("office.db"));
        assert!(config.open_database().is_ok());
        assert!(dir.path().join("office.db").exists());
    }
}
