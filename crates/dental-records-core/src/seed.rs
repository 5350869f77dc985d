//! Illustrative records installed on first run.
//!
//! Each collection gets exactly three records when it loads empty. Ids are
//! generated fresh; every other field is fixed.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Patient, PatientStatus, PatientType, Visit};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Sample patients.
pub fn patients() -> Vec<Patient> {
    vec![
        Patient {
            id: fresh_id(),
            first_name: "John".into(),
            last_name: "Smith".into(),
            date_of_birth: date(1985, 3, 15),
            phone: "555-0123".into(),
            email: Some("john.smith@email.com".into()),
            address: Some("123 Main St, Anytown, CA 90210".into()),
            medical_history: Some("No known allergies. Regular dental checkups.".into()),
            insurance_provider: Some("Blue Cross Blue Shield".into()),
            insurance_number: Some("BCBS123456789".into()),
            status: PatientStatus::Active,
            created_at: timestamp("2024-01-15T10:30:00.000Z"),
            last_visit: date(2024, 2, 15),
            next_appointment: date(2024, 5, 15),
        },
        Patient {
            id: fresh_id(),
            first_name: "Sarah".into(),
            last_name: "Johnson".into(),
            date_of_birth: date(1992, 7, 22),
            phone: "555-0456".into(),
            email: Some("sarah.j@email.com".into()),
            address: Some("456 Oak Ave, Somewhere, CA 90211".into()),
            medical_history: Some(
                "Sensitive to cold temperatures. Prefers warm water for cleaning.".into(),
            ),
            insurance_provider: Some("Aetna".into()),
            insurance_number: Some("AET789012345".into()),
            status: PatientStatus::Active,
            created_at: timestamp("2024-01-20T14:15:00.000Z"),
            last_visit: date(2024, 3, 1),
            next_appointment: date(2024, 6, 1),
        },
        Patient {
            id: fresh_id(),
            first_name: "Michael".into(),
            last_name: "Davis".into(),
            date_of_birth: date(1978, 11, 8),
            phone: "555-0789".into(),
            email: Some("michael.davis@email.com".into()),
            address: Some("789 Pine Rd, Elsewhere, CA 90212".into()),
            medical_history: Some("History of gum disease. Requires regular deep cleaning.".into()),
            insurance_provider: Some("Cigna".into()),
            insurance_number: Some("CIG456789012".into()),
            status: PatientStatus::Active,
            created_at: timestamp("2024-02-01T09:45:00.000Z"),
            last_visit: date(2024, 3, 20),
            next_appointment: date(2024, 4, 20),
        },
    ]
}

/// Sample visit records, one per sample patient.
pub fn visits() -> Vec<Visit> {
    let visit = |visit_date: Option<NaiveDate>,
                 patient_name: &str,
                 file_number: &str,
                 patient_type: PatientType,
                 procedure: &str,
                 price: f64,
                 discount: f64,
                 notes: &str,
                 created_at: &str| Visit {
        id: fresh_id(),
        visit_date: visit_date.unwrap_or_default(),
        patient_name: patient_name.into(),
        file_number: file_number.into(),
        patient_type,
        procedure: procedure.into(),
        price,
        discount,
        final_price: crate::models::final_price(price, discount),
        notes: Some(notes.into()),
        created_at: timestamp(created_at),
    };

    vec![
        visit(
            date(2024, 2, 15),
            "John Smith",
            "P001",
            PatientType::Cash,
            "Routine cleaning and examination",
            150.0,
            0.0,
            "No cavities found. Next cleaning in 3 months.",
            "2024-02-15T10:00:00.000Z",
        ),
        visit(
            date(2024, 3, 1),
            "Sarah Johnson",
            "P002",
            PatientType::Insurance,
            "Root canal treatment and crown",
            1200.0,
            100.0,
            "Insurance pre-authorization on file.",
            "2024-03-01T14:30:00.000Z",
        ),
        visit(
            date(2024, 3, 20),
            "Michael Davis",
            "P003",
            PatientType::Cash,
            "Composite filling",
            280.0,
            30.0,
            "Deep cleaning recommended at next visit.",
            "2024-03-20T09:15:00.000Z",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_patients() {
        let patients = patients();
        assert_eq!(patients.len(), 3);
        assert!(patients.iter().all(|p| p.is_active()));
        assert_eq!(patients[0].full_name(), "John Smith");
        assert_eq!(patients[1].full_name(), "Sarah Johnson");
    }

    #[test]
    fn test_seed_visits() {
        let visits = visits();
        let files: Vec<_> = visits.iter().map(|v| v.file_number.as_str()).collect();
        let finals: Vec<_> = visits.iter().map(|v| v.final_price).collect();

        assert_eq!(files, vec!["P001", "P002", "P003"]);
        assert_eq!(finals, vec![150.0, 1100.0, 250.0]);
    }

    #[test]
    fn test_seed_ids_unique() {
        let mut ids: Vec<_> = patients().into_iter().map(|p| p.id).collect();
        ids.extend(visits().into_iter().map(|v| v.id));
        let count = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), count);
    }
}
