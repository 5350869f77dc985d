//! Subcommands of the patient registry and the visit ledger.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use dental_records_core::models::final_price;
use dental_records_core::{
    Applied, CollectionStore, Database, DentalOffice, Filter, Intent, NewPatient, NewVisit,
    PatientChanges, PatientSortKey, PatientStatus, PatientType, VisitChanges, VisitSortKey,
};

use crate::render::{self, Table};

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum PatientAction {
    /// List patients
    List {
        /// Case-insensitive text matched against name, email and phone
        #[arg(long)]
        search: Option<String>,
        /// all, active or inactive
        #[arg(long, default_value = "all")]
        status: Filter<PatientStatus>,
        /// name, date or lastVisit (insertion order when omitted)
        #[arg(long)]
        sort: Option<PatientSortKey>,
    },
    /// Show one patient in full
    Show { id: String },
    /// Register a new patient
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        phone: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        date_of_birth: Option<NaiveDate>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        medical_history: Option<String>,
        #[arg(long)]
        insurance_provider: Option<String>,
        #[arg(long)]
        insurance_number: Option<String>,
    },
    /// Change the given fields of a patient
    Update {
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Date of birth (YYYY-MM-DD, empty to clear)
        #[arg(long)]
        date_of_birth: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        medical_history: Option<String>,
        #[arg(long)]
        insurance_provider: Option<String>,
        #[arg(long)]
        insurance_number: Option<String>,
        /// active or inactive
        #[arg(long)]
        status: Option<PatientStatus>,
        /// Last visit (YYYY-MM-DD, empty to clear)
        #[arg(long)]
        last_visit: Option<String>,
        /// Next appointment (YYYY-MM-DD, empty to clear)
        #[arg(long)]
        next_appointment: Option<String>,
    },
    /// Delete a patient
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show dashboard numbers
    Stats,
    /// Write all patients to stdout
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
    /// Append patients from a JSON file
    Import { file: PathBuf },
}

#[derive(Subcommand)]
pub enum VisitAction {
    /// List visits
    List {
        /// Case-insensitive text matched against patient name, file number and procedure
        #[arg(long)]
        search: Option<String>,
        /// all, cash or insurance
        #[arg(long = "type", default_value = "all")]
        patient_type: Filter<PatientType>,
        /// name or date (insertion order when omitted)
        #[arg(long)]
        sort: Option<VisitSortKey>,
    },
    /// Show one visit in full
    Show { id: String },
    /// Record a new visit
    Add {
        /// Visit date (YYYY-MM-DD, today when omitted)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        patient_name: String,
        #[arg(long)]
        file_number: String,
        /// cash or insurance
        #[arg(long = "type")]
        patient_type: PatientType,
        #[arg(long)]
        procedure: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        discount: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change the given fields of a visit
    Update {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        patient_name: Option<String>,
        #[arg(long)]
        file_number: Option<String>,
        #[arg(long = "type")]
        patient_type: Option<PatientType>,
        #[arg(long)]
        procedure: Option<String>,
        /// New price; the final price is recomputed
        #[arg(long)]
        price: Option<f64>,
        /// New discount; the final price is recomputed
        #[arg(long)]
        discount: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a visit
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Show dashboard numbers
    Stats,
    /// Write all visits to stdout
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
    },
    /// Append visits from a JSON file
    Import { file: PathBuf },
}

/// `None` when the flag is absent, `Some(None)` when it is blank.
fn date_change(field: &str, value: Option<String>) -> anyhow::Result<Option<Option<NaiveDate>>> {
    let Some(text) = value else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(Some(None));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("{} must be YYYY-MM-DD, got {:?}", field, text))?;
    Ok(Some(Some(date)))
}

fn report_import<T: std::fmt::Display>(applied: Applied<T>, label: &str) {
    match applied.save_error {
        None => eprintln!("Imported {} {}.", applied.value, label),
        Some(e) => eprintln!("Imported {} {} but could not save: {}", applied.value, label, e),
    }
}

pub fn run_status(office: &DentalOffice<Database>) -> anyhow::Result<()> {
    let summaries = office
        .store()
        .collection_summaries()
        .context("failed to read stored collections")?;
    print!("{}", render::collections(&summaries));
    Ok(())
}

pub fn run_patients<S: CollectionStore>(
    office: &mut DentalOffice<S>,
    action: PatientAction,
) -> anyhow::Result<()> {
    let mut table = Table::new(office.today(), office.config().currency_symbol());

    match action {
        PatientAction::List {
            search,
            status,
            sort,
        } => {
            if let Some(text) = search {
                office.dispatch_patients(Intent::SearchChanged(text), &mut table)?;
            }
            office.dispatch_patients(Intent::FilterChanged(status), &mut table)?;
            office.dispatch_patients(Intent::SortChanged(sort), &mut table)?;
        }
        PatientAction::Show { id } => {
            office.dispatch_patients(Intent::DetailRequested(id), &mut table)?;
        }
        PatientAction::Add {
            first_name,
            last_name,
            phone,
            date_of_birth,
            email,
            address,
            medical_history,
            insurance_provider,
            insurance_number,
        } => {
            let draft = NewPatient {
                first_name,
                last_name,
                date_of_birth,
                phone,
                email,
                address,
                medical_history,
                insurance_provider,
                insurance_number,
            };
            office.dispatch_patients(Intent::CreateRequested(draft), &mut table)?;
        }
        PatientAction::Update {
            id,
            first_name,
            last_name,
            phone,
            date_of_birth,
            email,
            address,
            medical_history,
            insurance_provider,
            insurance_number,
            status,
            last_visit,
            next_appointment,
        } => {
            let changes = PatientChanges {
                first_name,
                last_name,
                date_of_birth: date_change("date of birth", date_of_birth)?,
                phone,
                email,
                address,
                medical_history,
                insurance_provider,
                insurance_number,
                status,
                last_visit: date_change("last visit", last_visit)?,
                next_appointment: date_change("next appointment", next_appointment)?,
            };
            if changes.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            office.dispatch_patients(Intent::UpdateRequested { id, changes }, &mut table)?;
        }
        PatientAction::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete patient {} without --yes", id);
            }
            office.dispatch_patients(Intent::DeleteRequested(id), &mut table)?;
        }
        PatientAction::Stats => {
            println!(
                "{}",
                render::patient_stats(&office.patient_stats(), office.config().currency_symbol())
            );
            return Ok(());
        }
        PatientAction::Export { format } => {
            let export = office.export_patients();
            match format {
                ExportFormat::Json => println!("{}", export.to_json()?),
                ExportFormat::Csv => print!("{}", export.to_csv()),
            }
            return Ok(());
        }
        PatientAction::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            report_import(office.import_patients(&json)?, "patients");
            return Ok(());
        }
    }

    table.finish();
    Ok(())
}

pub fn run_visits<S: CollectionStore>(
    office: &mut DentalOffice<S>,
    action: VisitAction,
) -> anyhow::Result<()> {
    let mut table = Table::new(office.today(), office.config().currency_symbol());

    match action {
        VisitAction::List {
            search,
            patient_type,
            sort,
        } => {
            if let Some(text) = search {
                office.dispatch_visits(Intent::SearchChanged(text), &mut table)?;
            }
            office.dispatch_visits(Intent::FilterChanged(patient_type), &mut table)?;
            office.dispatch_visits(Intent::SortChanged(sort), &mut table)?;
        }
        VisitAction::Show { id } => {
            office.dispatch_visits(Intent::DetailRequested(id), &mut table)?;
        }
        VisitAction::Add {
            date,
            patient_name,
            file_number,
            patient_type,
            procedure,
            price,
            discount,
            notes,
        } => {
            let draft = NewVisit {
                visit_date: Some(date.unwrap_or_else(|| office.today())),
                patient_name,
                file_number,
                patient_type,
                procedure,
                price,
                discount,
                notes,
            };
            office.dispatch_visits(Intent::CreateRequested(draft), &mut table)?;
        }
        VisitAction::Update {
            id,
            date,
            patient_name,
            file_number,
            patient_type,
            procedure,
            price,
            discount,
            notes,
        } => {
            // Like the visit form: a new price or discount re-derives the final price.
            let recomputed = if price.is_some() || discount.is_some() {
                let current = office.visits().get(&id)?;
                Some(final_price(
                    price.unwrap_or(current.price),
                    discount.unwrap_or(current.discount),
                ))
            } else {
                None
            };
            let changes = VisitChanges {
                visit_date: date,
                patient_name,
                file_number,
                patient_type,
                procedure,
                price,
                discount,
                final_price: recomputed,
                notes,
            };
            if changes.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            office.dispatch_visits(Intent::UpdateRequested { id, changes }, &mut table)?;
        }
        VisitAction::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete visit {} without --yes", id);
            }
            office.dispatch_visits(Intent::DeleteRequested(id), &mut table)?;
        }
        VisitAction::Stats => {
            println!(
                "{}",
                render::visit_stats(&office.visit_stats(), office.config().currency_symbol())
            );
            return Ok(());
        }
        VisitAction::Export { format } => {
            let export = office.export_visits();
            match format {
                ExportFormat::Json => println!("{}", export.to_json()?),
                ExportFormat::Csv => print!("{}", export.to_csv()),
            }
            return Ok(());
        }
        VisitAction::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            report_import(office.import_visits(&json)?, "visits");
            return Ok(());
        }
    }

    table.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dental_records_core::{MemoryStore, OfficeConfig};

    fn office() -> DentalOffice<MemoryStore> {
        DentalOffice::open(OfficeConfig::default(), MemoryStore::new()).unwrap()
    }

    fn visit_update(id: &str) -> VisitAction {
        VisitAction::Update {
            id: id.to_string(),
            date: None,
            patient_name: None,
            file_number: None,
            patient_type: None,
            procedure: None,
            price: None,
            discount: None,
            notes: None,
        }
    }

    #[test]
    fn test_date_change() {
        assert_eq!(date_change("last visit", None).unwrap(), None);
        assert_eq!(date_change("last visit", Some(String::new())).unwrap(), Some(None));
        assert_eq!(date_change("last visit", Some("  ".into())).unwrap(), Some(None));
        assert_eq!(
            date_change("last visit", Some("2024-05-01".into())).unwrap(),
            Some(NaiveDate::from_ymd_opt(2024, 5, 1))
        );
        assert!(date_change("last visit", Some("05/01/2024".into())).is_err());
    }

    #[test]
    fn test_visit_discount_update_recomputes_final_price() {
        let mut office = office();
        let id = office.visits().all()[1].id.clone();

        let mut action = visit_update(&id);
        if let VisitAction::Update { discount, .. } = &mut action {
            *discount = Some(50.0);
        }
        run_visits(&mut office, action).unwrap();

        let visit = office.visits().get(&id).unwrap();
        assert_eq!(visit.price, 1200.0);
        assert_eq!(visit.discount, 50.0);
        assert_eq!(visit.final_price, 1150.0);
    }

    #[test]
    fn test_visit_price_update_keeps_discount() {
        let mut office = office();
        let id = office.visits().all()[2].id.clone();

        let mut action = visit_update(&id);
        if let VisitAction::Update { price, .. } = &mut action {
            *price = Some(20.0);
        }
        run_visits(&mut office, action).unwrap();

        // 20 - 30 clamps at zero
        let visit = office.visits().get(&id).unwrap();
        assert_eq!(visit.discount, 30.0);
        assert_eq!(visit.final_price, 0.0);
    }

    #[test]
    fn test_visit_notes_update_leaves_final_price() {
        let mut office = office();
        let id = office.visits().all()[0].id.clone();

        let mut action = visit_update(&id);
        if let VisitAction::Update { notes, .. } = &mut action {
            *notes = Some("Follow-up booked".into());
        }
        run_visits(&mut office, action).unwrap();

        let visit = office.visits().get(&id).unwrap();
        assert_eq!(visit.final_price, 150.0);
        assert_eq!(visit.notes.as_deref(), Some("Follow-up booked"));
    }

    #[test]
    fn test_empty_update_rejected() {
        let mut office = office();
        let id = office.visits().all()[0].id.clone();
        assert!(run_visits(&mut office, visit_update(&id)).is_err());
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let mut office = office();
        let id = office.patients().all()[0].id.clone();

        let refused = run_patients(
            &mut office,
            PatientAction::Delete {
                id: id.clone(),
                yes: false,
            },
        );
        assert!(refused.is_err());
        assert_eq!(office.patients().len(), 3);

        run_patients(&mut office, PatientAction::Delete { id, yes: true }).unwrap();
        assert_eq!(office.patients().len(), 2);
    }

    #[test]
    fn test_status_reports_seeded_collections() {
        let db = Database::open_in_memory().unwrap();
        let office = DentalOffice::open(OfficeConfig::default(), db).unwrap();
        run_status(&office).unwrap();

        let counts: Vec<_> = office
            .store()
            .collection_summaries()
            .unwrap()
            .into_iter()
            .map(|s| (s.key, s.record_count))
            .collect();
        assert_eq!(
            counts,
            vec![("dentalPatients".to_string(), 3), ("dentalVisits".to_string(), 3)]
        );
    }
}
