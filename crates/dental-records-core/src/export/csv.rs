//! CSV rows for each record type.

use crate::models::{Patient, Visit};

/// A record that can be written as one CSV line.
pub trait CsvRow {
    const HEADER: &'static [&'static str];

    /// Unescaped field values, in `HEADER` order.
    fn csv_fields(&self) -> Vec<String>;
}

fn opt_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

impl CsvRow for Patient {
    const HEADER: &'static [&'static str] = &[
        "id",
        "firstName",
        "lastName",
        "dateOfBirth",
        "phone",
        "email",
        "address",
        "medicalHistory",
        "insuranceProvider",
        "insuranceNumber",
        "status",
        "createdAt",
        "lastVisit",
        "nextAppointment",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            opt_date(self.date_of_birth),
            self.phone.clone(),
            self.email.clone().unwrap_or_default(),
            self.address.clone().unwrap_or_default(),
            self.medical_history.clone().unwrap_or_default(),
            self.insurance_provider.clone().unwrap_or_default(),
            self.insurance_number.clone().unwrap_or_default(),
            self.status.to_string(),
            self.created_at.to_rfc3339(),
            opt_date(self.last_visit),
            opt_date(self.next_appointment),
        ]
    }
}

impl CsvRow for Visit {
    const HEADER: &'static [&'static str] = &[
        "id",
        "visitDate",
        "patientName",
        "fileNumber",
        "patientType",
        "procedure",
        "price",
        "discount",
        "finalPrice",
        "notes",
        "createdAt",
    ];

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.visit_date.to_string(),
            self.patient_name.clone(),
            self.file_number.clone(),
            self.patient_type.to_string(),
            self.procedure.clone(),
            format!("{:.2}", self.price),
            format!("{:.2}", self.discount),
            format!("{:.2}", self.final_price),
            self.notes.clone().unwrap_or_default(),
            self.created_at.to_rfc3339(),
        ]
    }
}

/// Escape a string for CSV output.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    #[test]
    fn test_csv_escaping() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_field_count_matches_header() {
        let patient = &seed::patients()[0];
        assert_eq!(patient.csv_fields().len(), Patient::HEADER.len());

        let visit = &seed::visits()[0];
        assert_eq!(visit.csv_fields().len(), Visit::HEADER.len());
    }

    #[test]
    fn test_patient_blank_optionals() {
        let mut patient = seed::patients().remove(0);
        patient.email = None;
        patient.last_visit = None;

        let fields = patient.csv_fields();
        assert_eq!(fields[5], "");
        assert_eq!(fields[12], "");
    }
}
