//! Dental Records Core Library
//!
//! Local-first record manager for a small dental office: a patient registry
//! and a visit ledger, each a searchable, filterable, sortable collection with
//! create/update/delete.
//!
//! # Architecture
//!
//! ```text
//!   Front end (CLI / native app)
//!        │ Intent                        ▲ view + stats + notice
//!        ▼                               │
//!   ┌──────────────────── DentalOffice ──┴────────────────────┐
//!   │  RecordBook<Patient>                RecordBook<Visit>    │
//!   │   ├ lifecycle: create / update / delete                  │
//!   │   ├ full collection (creation order)                     │
//!   │   └ view = Query { search, filter, sort }.run(all)       │
//!   └───────────────────────────┬──────────────────────────────┘
//!                               │ save(key, all) after every mutation
//!                               ▼
//!               CollectionStore (SQLite / memory)
//!          "dentalPatients"            "dentalVisits"
//! ```
//!
//! # Modules
//!
//! - [`db`]: collection store trait, SQLite and in-memory stores
//! - [`models`]: Patient and Visit records
//! - [`query`]: search / filter / sort engine
//! - [`records`]: record books and their lifecycle
//! - [`stats`]: dashboard aggregates
//! - [`format`]: age, phone, currency and date helpers
//! - [`presenter`]: intents, notices and the presenter trait
//! - [`office`]: intent dispatch over both record books
//! - [`export`]: JSON/CSV export and import

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod format;
pub mod models;
pub mod office;
pub mod presenter;
pub mod query;
pub mod records;
pub mod seed;
pub mod stats;

// Re-export commonly used types
pub use config::OfficeConfig;
pub use db::{CollectionStore, Database, DbError, MemoryStore};
pub use error::{CoreError, CoreResult};
pub use models::{
    NewPatient, NewVisit, Patient, PatientChanges, PatientStatus, PatientType, Record, Visit,
    VisitChanges,
};
pub use office::DentalOffice;
pub use presenter::{Intent, Notice, NoticeLevel, Presenter, Snapshot};
pub use query::{Filter, PatientSortKey, Query, VisitSortKey};
pub use records::{Applied, Managed, RecordBook};
pub use stats::{PatientStats, VisitStats};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DentalRecordsError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<CoreError> for DentalRecordsError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(msg) => DentalRecordsError::ValidationError(msg),
            CoreError::NotFound(msg) => DentalRecordsError::NotFound(msg),
            CoreError::Persistence(e) => DentalRecordsError::PersistenceError(e.to_string()),
            CoreError::Config(msg) => DentalRecordsError::InvalidInput(msg),
        }
    }
}

impl From<DbError> for DentalRecordsError {
    fn from(e: DbError) -> Self {
        DentalRecordsError::PersistenceError(e.to_string())
    }
}

impl From<serde_json::Error> for DentalRecordsError {
    fn from(e: serde_json::Error) -> Self {
        DentalRecordsError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DentalRecordsError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DentalRecordsError::PersistenceError(format!("Lock poisoned: {}", e))
    }
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, DentalRecordsError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        DentalRecordsError::InvalidInput(format!("{} must be YYYY-MM-DD: {}", field, e))
    })
}

/// Blank means "no date".
fn parse_optional_date(
    field: &str,
    value: Option<String>,
) -> Result<Option<NaiveDate>, DentalRecordsError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => parse_date(field, text).map(Some),
    }
}

fn parse_with<T, E: std::fmt::Display>(
    value: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, DentalRecordsError> {
    parse(value).map_err(|e| DentalRecordsError::InvalidInput(e.to_string()))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create an office database at the given path.
#[uniffi::export]
pub fn open_office(path: String) -> Result<Arc<DentalRecordsCore>, DentalRecordsError> {
    let config = OfficeConfig::default().with_database_path(path);
    let db = config.open_database()?;
    let office = DentalOffice::open(config, db)?;
    Ok(Arc::new(DentalRecordsCore {
        office: Arc::new(Mutex::new(office)),
    }))
}

/// Create an in-memory office (for testing).
#[uniffi::export]
pub fn open_office_in_memory() -> Result<Arc<DentalRecordsCore>, DentalRecordsError> {
    let config = OfficeConfig::default();
    let db = Database::open_in_memory()?;
    let office = DentalOffice::open(config, db)?;
    Ok(Arc::new(DentalRecordsCore {
        office: Arc::new(Mutex::new(office)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe office wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DentalRecordsCore {
    office: Arc<Mutex<DentalOffice<Database>>>,
}

impl DentalRecordsCore {
    fn patient_intent(
        &self,
        intent: Intent<Patient>,
    ) -> Result<FfiPatientScreen, DentalRecordsError> {
        let mut office = self.office.lock()?;
        let mut screen = Snapshot::default();
        office.dispatch_patients(intent, &mut screen)?;
        Ok(FfiPatientScreen::from_snapshot(
            screen,
            office.today(),
            office.config().currency_symbol(),
        ))
    }

    fn visit_intent(&self, intent: Intent<Visit>) -> Result<FfiVisitScreen, DentalRecordsError> {
        let mut office = self.office.lock()?;
        let mut screen = Snapshot::default();
        office.dispatch_visits(intent, &mut screen)?;
        Ok(FfiVisitScreen::from_snapshot(
            screen,
            office.config().currency_symbol(),
        ))
    }
}

#[uniffi::export]
impl DentalRecordsCore {
    // =========================================================================
    // Patient Registry
    // =========================================================================

    /// Current patient view and stats.
    pub fn patients_screen(&self) -> Result<FfiPatientScreen, DentalRecordsError> {
        let office = self.office.lock()?;
        let mut screen = Snapshot::default();
        office.render_patients(&mut screen);
        Ok(FfiPatientScreen::from_snapshot(
            screen,
            office.today(),
            office.config().currency_symbol(),
        ))
    }

    /// Register a new patient.
    pub fn create_patient(
        &self,
        input: FfiPatientInput,
    ) -> Result<FfiPatientScreen, DentalRecordsError> {
        let draft = input.try_into()?;
        self.patient_intent(Intent::CreateRequested(draft))
    }

    /// Update the supplied fields of a patient.
    pub fn update_patient(
        &self,
        id: String,
        update: FfiPatientUpdate,
    ) -> Result<FfiPatientScreen, DentalRecordsError> {
        let changes = update.try_into()?;
        self.patient_intent(Intent::UpdateRequested { id, changes })
    }

    /// Delete a patient. The caller has already confirmed with the user.
    pub fn delete_patient(&self, id: String) -> Result<FfiPatientScreen, DentalRecordsError> {
        self.patient_intent(Intent::DeleteRequested(id))
    }

    pub fn search_patients(&self, text: String) -> Result<FfiPatientScreen, DentalRecordsError> {
        self.patient_intent(Intent::SearchChanged(text))
    }

    /// `status` is "all", "active" or "inactive".
    pub fn filter_patients(&self, status: String) -> Result<FfiPatientScreen, DentalRecordsError> {
        let filter = parse_with(&status, str::parse::<Filter<PatientStatus>>)?;
        self.patient_intent(Intent::FilterChanged(filter))
    }

    /// `key` is "name", "date", "lastVisit", or none for insertion order.
    pub fn sort_patients(
        &self,
        key: Option<String>,
    ) -> Result<FfiPatientScreen, DentalRecordsError> {
        let key = key
            .map(|k| parse_with(&k, str::parse::<PatientSortKey>))
            .transpose()?;
        self.patient_intent(Intent::SortChanged(key))
    }

    /// Full patient record.
    pub fn patient_detail(&self, id: String) -> Result<FfiPatient, DentalRecordsError> {
        let mut office = self.office.lock()?;
        let mut screen = Snapshot::default();
        office.dispatch_patients(Intent::DetailRequested(id.clone()), &mut screen)?;
        let patient = screen
            .detail
            .ok_or_else(|| DentalRecordsError::NotFound(id))?;
        Ok(FfiPatient::new(patient, office.today()))
    }

    /// Append patients from a browser storage dump or an export document.
    pub fn import_patients(&self, json: String) -> Result<u32, DentalRecordsError> {
        let mut office = self.office.lock()?;
        let applied = office.import_patients(&json)?;
        Ok(applied.into_result()? as u32)
    }

    /// Export all patients as JSON.
    pub fn export_patients_json(&self) -> Result<String, DentalRecordsError> {
        let office = self.office.lock()?;
        Ok(office.export_patients().to_json()?)
    }

    /// Export all patients as CSV.
    pub fn export_patients_csv(&self) -> Result<String, DentalRecordsError> {
        let office = self.office.lock()?;
        Ok(office.export_patients().to_csv())
    }

    // =========================================================================
    // Visit Ledger
    // =========================================================================

    /// Current visit view and stats.
    pub fn visits_screen(&self) -> Result<FfiVisitScreen, DentalRecordsError> {
        let office = self.office.lock()?;
        let mut screen = Snapshot::default();
        office.render_visits(&mut screen);
        Ok(FfiVisitScreen::from_snapshot(
            screen,
            office.config().currency_symbol(),
        ))
    }

    /// Record a new visit.
    pub fn create_visit(&self, input: FfiVisitInput) -> Result<FfiVisitScreen, DentalRecordsError> {
        let draft = input.try_into()?;
        self.visit_intent(Intent::CreateRequested(draft))
    }

    /// Update the supplied fields of a visit. `final_price` is taken as given.
    pub fn update_visit(
        &self,
        id: String,
        update: FfiVisitUpdate,
    ) -> Result<FfiVisitScreen, DentalRecordsError> {
        let changes = update.try_into()?;
        self.visit_intent(Intent::UpdateRequested { id, changes })
    }

    pub fn delete_visit(&self, id: String) -> Result<FfiVisitScreen, DentalRecordsError> {
        self.visit_intent(Intent::DeleteRequested(id))
    }

    pub fn search_visits(&self, text: String) -> Result<FfiVisitScreen, DentalRecordsError> {
        self.visit_intent(Intent::SearchChanged(text))
    }

    /// `patient_type` is "all", "cash" or "insurance".
    pub fn filter_visits(&self, patient_type: String) -> Result<FfiVisitScreen, DentalRecordsError> {
        let filter = parse_with(&patient_type, str::parse::<Filter<PatientType>>)?;
        self.visit_intent(Intent::FilterChanged(filter))
    }

    /// `key` is "name", "date", or none for insertion order.
    pub fn sort_visits(&self, key: Option<String>) -> Result<FfiVisitScreen, DentalRecordsError> {
        let key = key
            .map(|k| parse_with(&k, str::parse::<VisitSortKey>))
            .transpose()?;
        self.visit_intent(Intent::SortChanged(key))
    }

    /// Full visit record.
    pub fn visit_detail(&self, id: String) -> Result<FfiVisit, DentalRecordsError> {
        let mut office = self.office.lock()?;
        let mut screen = Snapshot::default();
        office.dispatch_visits(Intent::DetailRequested(id.clone()), &mut screen)?;
        let visit = screen
            .detail
            .ok_or_else(|| DentalRecordsError::NotFound(id))?;
        Ok(FfiVisit::new(visit, office.config().currency_symbol()))
    }

    /// Append visits from a browser storage dump or an export document.
    pub fn import_visits(&self, json: String) -> Result<u32, DentalRecordsError> {
        let mut office = self.office.lock()?;
        let applied = office.import_visits(&json)?;
        Ok(applied.into_result()? as u32)
    }

    pub fn export_visits_json(&self) -> Result<String, DentalRecordsError> {
        let office = self.office.lock()?;
        Ok(office.export_visits().to_json()?)
    }

    pub fn export_visits_csv(&self) -> Result<String, DentalRecordsError> {
        let office = self.office.lock()?;
        Ok(office.export_visits().to_csv())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe notice.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotice {
    pub level: String,
    pub message: String,
}

impl From<Notice> for FfiNotice {
    fn from(notice: Notice) -> Self {
        Self {
            level: notice.level.to_string(),
            message: notice.message,
        }
    }
}

/// FFI-safe patient, with display fields precomputed.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub initials: String,
    pub date_of_birth: Option<String>,
    pub age: Option<i32>,
    pub phone: String,
    pub formatted_phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub status: String,
    pub created_at: String,
    pub last_visit: Option<String>,
    pub next_appointment: Option<String>,
}

impl FfiPatient {
    fn new(patient: Patient, today: NaiveDate) -> Self {
        Self {
            initials: format::initials(&patient.first_name, &patient.last_name),
            age: patient.date_of_birth.map(|dob| format::age_on(dob, today)),
            formatted_phone: format::format_phone(&patient.phone),
            date_of_birth: patient.date_of_birth.map(|d| d.to_string()),
            status: patient.status.to_string(),
            created_at: patient.created_at.to_rfc3339(),
            last_visit: patient.last_visit.map(|d| d.to_string()),
            next_appointment: patient.next_appointment.map(|d| d.to_string()),
            id: patient.id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            phone: patient.phone,
            email: patient.email,
            address: patient.address,
            medical_history: patient.medical_history,
            insurance_provider: patient.insurance_provider,
            insurance_number: patient.insurance_number,
        }
    }
}

/// FFI-safe new patient form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientInput {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
}

impl TryFrom<FfiPatientInput> for NewPatient {
    type Error = DentalRecordsError;

    fn try_from(input: FfiPatientInput) -> Result<Self, Self::Error> {
        Ok(NewPatient {
            date_of_birth: parse_optional_date("dateOfBirth", input.date_of_birth)?,
            first_name: input.first_name,
            last_name: input.last_name,
            phone: input.phone,
            email: input.email,
            address: input.address,
            medical_history: input.medical_history,
            insurance_provider: input.insurance_provider,
            insurance_number: input.insurance_number,
        })
    }
}

/// FFI-safe patient update. Absent fields keep their value; a blank date
/// clears it.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub status: Option<String>,
}

impl TryFrom<FfiPatientUpdate> for PatientChanges {
    type Error = DentalRecordsError;

    fn try_from(update: FfiPatientUpdate) -> Result<Self, Self::Error> {
        let date_of_birth = match update.date_of_birth {
            None => None,
            Some(text) => Some(parse_optional_date("dateOfBirth", Some(text))?),
        };
        let status = update
            .status
            .map(|s| parse_with(&s, str::parse::<PatientStatus>))
            .transpose()?;

        Ok(PatientChanges {
            first_name: update.first_name,
            last_name: update.last_name,
            date_of_birth,
            phone: update.phone,
            email: update.email,
            address: update.address,
            medical_history: update.medical_history,
            insurance_provider: update.insurance_provider,
            insurance_number: update.insurance_number,
            status,
            ..Default::default()
        })
    }
}

/// FFI-safe patient dashboard numbers.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientStats {
    pub total_patients: u32,
    pub active_patients: u32,
    pub today_appointments: u32,
    pub pending_appointments: u32,
    pub monthly_revenue: f64,
    pub monthly_revenue_display: String,
}

impl FfiPatientStats {
    fn new(stats: PatientStats, currency_symbol: &str) -> Self {
        Self {
            total_patients: stats.total_patients as u32,
            active_patients: stats.active_patients as u32,
            today_appointments: stats.today_appointments as u32,
            pending_appointments: stats.pending_appointments as u32,
            monthly_revenue: stats.monthly_revenue,
            monthly_revenue_display: format::format_currency(stats.monthly_revenue, currency_symbol),
        }
    }
}

/// FFI-safe patient table state.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientScreen {
    pub patients: Vec<FfiPatient>,
    pub stats: Option<FfiPatientStats>,
    pub notice: Option<FfiNotice>,
}

impl FfiPatientScreen {
    fn from_snapshot(screen: Snapshot<Patient>, today: NaiveDate, currency_symbol: &str) -> Self {
        Self {
            patients: screen
                .view
                .into_iter()
                .map(|p| FfiPatient::new(p, today))
                .collect(),
            stats: screen
                .stats
                .map(|s| FfiPatientStats::new(s, currency_symbol)),
            notice: screen.notices.into_iter().last().map(Into::into),
        }
    }
}

/// FFI-safe visit.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub id: String,
    pub visit_date: String,
    pub patient_name: String,
    pub file_number: String,
    pub patient_type: String,
    pub procedure: String,
    pub price: f64,
    pub discount: f64,
    pub final_price: f64,
    pub final_price_display: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl FfiVisit {
    fn new(visit: Visit, currency_symbol: &str) -> Self {
        Self {
            visit_date: visit.visit_date.to_string(),
            patient_type: visit.patient_type.to_string(),
            final_price_display: format::format_currency(visit.final_price, currency_symbol),
            created_at: visit.created_at.to_rfc3339(),
            id: visit.id,
            patient_name: visit.patient_name,
            file_number: visit.file_number,
            procedure: visit.procedure,
            price: visit.price,
            discount: visit.discount,
            final_price: visit.final_price,
            notes: visit.notes,
        }
    }
}

/// FFI-safe new visit form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitInput {
    pub visit_date: String,
    pub patient_name: String,
    pub file_number: String,
    pub patient_type: String,
    pub procedure: String,
    pub price: f64,
    pub discount: Option<f64>,
    pub notes: Option<String>,
}

impl TryFrom<FfiVisitInput> for NewVisit {
    type Error = DentalRecordsError;

    fn try_from(input: FfiVisitInput) -> Result<Self, Self::Error> {
        Ok(NewVisit {
            visit_date: parse_optional_date("visitDate", Some(input.visit_date))?,
            patient_type: parse_with(&input.patient_type, str::parse::<PatientType>)?,
            patient_name: input.patient_name,
            file_number: input.file_number,
            procedure: input.procedure,
            price: input.price,
            discount: input.discount,
            notes: input.notes,
        })
    }
}

/// FFI-safe visit update.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitUpdate {
    pub visit_date: Option<String>,
    pub patient_name: Option<String>,
    pub file_number: Option<String>,
    pub patient_type: Option<String>,
    pub procedure: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub final_price: Option<f64>,
    pub notes: Option<String>,
}

impl TryFrom<FfiVisitUpdate> for VisitChanges {
    type Error = DentalRecordsError;

    fn try_from(update: FfiVisitUpdate) -> Result<Self, Self::Error> {
        Ok(VisitChanges {
            visit_date: update
                .visit_date
                .map(|d| parse_date("visitDate", &d))
                .transpose()?,
            patient_type: update
                .patient_type
                .map(|t| parse_with(&t, str::parse::<PatientType>))
                .transpose()?,
            patient_name: update.patient_name,
            file_number: update.file_number,
            procedure: update.procedure,
            price: update.price,
            discount: update.discount,
            final_price: update.final_price,
            notes: update.notes,
        })
    }
}

/// FFI-safe visit dashboard numbers.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitStats {
    pub total_visits: u32,
    pub today_visits: u32,
    pub cash_patients: u32,
    pub insurance_patients: u32,
    pub total_revenue: f64,
    pub total_revenue_display: String,
    pub total_discounts: f64,
}

impl FfiVisitStats {
    fn new(stats: VisitStats, currency_symbol: &str) -> Self {
        Self {
            total_visits: stats.total_visits as u32,
            today_visits: stats.today_visits as u32,
            cash_patients: stats.cash_patients as u32,
            insurance_patients: stats.insurance_patients as u32,
            total_revenue: stats.total_revenue,
            total_revenue_display: format::format_currency(stats.total_revenue, currency_symbol),
            total_discounts: stats.total_discounts,
        }
    }
}

/// FFI-safe visit table state.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitScreen {
    pub visits: Vec<FfiVisit>,
    pub stats: Option<FfiVisitStats>,
    pub notice: Option<FfiNotice>,
}

impl FfiVisitScreen {
    fn from_snapshot(screen: Snapshot<Visit>, currency_symbol: &str) -> Self {
        Self {
            visits: screen
                .view
                .into_iter()
                .map(|v| FfiVisit::new(v, currency_symbol))
                .collect(),
            stats: screen.stats.map(|s| FfiVisitStats::new(s, currency_symbol)),
            notice: screen.notices.into_iter().last().map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> FfiPatientInput {
        FfiPatientInput {
            first_name: "Ana".into(),
            last_name: "Lee".into(),
            date_of_birth: Some("1990-06-01".into()),
            phone: "5551234567".into(),
            email: None,
            address: None,
            medical_history: None,
            insurance_provider: None,
            insurance_number: None,
        }
    }

    #[test]
    fn test_ffi_create_patient() {
        let core = open_office_in_memory().unwrap();
        let screen = core.create_patient(ana()).unwrap();

        assert_eq!(screen.patients.len(), 4);
        let created = screen
            .patients
            .iter()
            .find(|p| p.first_name == "Ana")
            .unwrap();
        assert_eq!(created.formatted_phone, "(555) 123-4567");
        assert_eq!(created.status, "active");
        assert_eq!(created.initials, "AL");
        assert!(created.age.is_some());
        assert_eq!(screen.notice.unwrap().level, "success");
    }

    #[test]
    fn test_ffi_bad_date_is_invalid_input() {
        let core = open_office_in_memory().unwrap();
        let mut input = ana();
        input.date_of_birth = Some("06/01/1990".into());

        assert!(matches!(
            core.create_patient(input),
            Err(DentalRecordsError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ffi_filter_and_sort_visits() {
        let core = open_office_in_memory().unwrap();

        let screen = core.filter_visits("cash".into()).unwrap();
        assert_eq!(screen.visits.len(), 2);

        let screen = core.sort_visits(Some("name".into())).unwrap();
        assert_eq!(screen.visits[0].patient_name, "John Smith");
        assert_eq!(screen.visits[1].patient_name, "Michael Davis");

        let stats = screen.stats.unwrap();
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.total_revenue_display, "$1,500.00");
    }

    #[test]
    fn test_ffi_update_visit_and_detail() {
        let core = open_office_in_memory().unwrap();
        let id = core.visits_screen().unwrap().visits[0].id.clone();

        core.update_visit(
            id.clone(),
            FfiVisitUpdate {
                visit_date: None,
                patient_name: None,
                file_number: None,
                patient_type: None,
                procedure: None,
                price: None,
                discount: Some(50.0),
                final_price: None,
                notes: None,
            },
        )
        .unwrap();

        let visit = core.visit_detail(id).unwrap();
        assert_eq!(visit.discount, 50.0);
        assert_eq!(visit.final_price, 150.0);
        assert_eq!(visit.final_price_display, "$150.00");
    }

    #[test]
    fn test_ffi_not_found() {
        let core = open_office_in_memory().unwrap();
        assert!(matches!(
            core.patient_detail("missing".into()),
            Err(DentalRecordsError::NotFound(_))
        ));
    }

    #[test]
    fn test_ffi_export_import_round_trip() {
        let core = open_office_in_memory().unwrap();
        let json = core.export_patients_json().unwrap();

        assert_eq!(core.import_patients(json).unwrap(), 3);
        assert_eq!(core.patients_screen().unwrap().patients.len(), 6);
        assert_eq!(core.export_patients_csv().unwrap().lines().count(), 7);
    }
}
