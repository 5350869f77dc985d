//! Visit ledger models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{amount, optional_text, require, Record};
use crate::error::{CoreError, CoreResult};

/// How the visit is paid for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PatientType {
    Cash,
    Insurance,
}

impl PatientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientType::Cash => "cash",
            PatientType::Insurance => "insurance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PatientType::Cash => "Cash",
            PatientType::Insurance => "Insurance",
        }
    }
}

impl fmt::Display for PatientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PatientType::Cash),
            "insurance" => Ok(PatientType::Insurance),
            other => Err(CoreError::Validation(format!(
                "unknown patient type: {}",
                other
            ))),
        }
    }
}

/// Price after discount, floored at zero.
pub fn final_price(price: f64, discount: f64) -> f64 {
    (price - discount).max(0.0)
}

/// A visit record in the ledger.
///
/// `patient_name` and `file_number` are a denormalized copy of the patient
/// reference; nothing ties them to a registry entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub visit_date: NaiveDate,
    pub patient_name: String,
    pub file_number: String,
    pub patient_type: PatientType,
    pub procedure: String,
    /// Charge before discount
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    /// Stored as given; never re-derived on load or partial update
    pub final_price: f64,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when recording a new visit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub visit_date: Option<NaiveDate>,
    pub patient_name: String,
    pub file_number: String,
    pub patient_type: PatientType,
    pub procedure: String,
    pub price: f64,
    /// Defaults to 0
    #[serde(default)]
    pub discount: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update for a visit. `None` leaves the stored value alone.
///
/// `final_price` is not recomputed when `price` or `discount` change; callers
/// that want it consistent must supply it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitChanges {
    pub visit_date: Option<NaiveDate>,
    pub patient_name: Option<String>,
    pub file_number: Option<String>,
    pub patient_type: Option<PatientType>,
    pub procedure: Option<String>,
    pub price: Option<f64>,
    pub discount: Option<f64>,
    pub final_price: Option<f64>,
    pub notes: Option<String>,
}

impl VisitChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Visit {
    /// Build a new visit from validated input, deriving `final_price`.
    pub fn create(draft: NewVisit, id: String, now: DateTime<Utc>) -> CoreResult<Self> {
        let visit_date = draft
            .visit_date
            .ok_or_else(|| CoreError::missing("visitDate"))?;
        let price = amount("price", draft.price)?;
        let discount = amount("discount", draft.discount.unwrap_or(0.0))?;

        Ok(Self {
            id,
            visit_date,
            patient_name: require("patientName", draft.patient_name)?,
            file_number: require("fileNumber", draft.file_number)?,
            patient_type: draft.patient_type,
            procedure: require("procedure", draft.procedure)?,
            price,
            discount,
            final_price: final_price(price, discount),
            notes: optional_text(draft.notes),
            created_at: now,
        })
    }

    /// Merge `changes` over this record. `id` and `created_at` are untouched.
    pub fn apply(&mut self, changes: VisitChanges) -> CoreResult<()> {
        let patient_name = changes
            .patient_name
            .map(|v| require("patientName", v))
            .transpose()?;
        let file_number = changes
            .file_number
            .map(|v| require("fileNumber", v))
            .transpose()?;
        let procedure = changes
            .procedure
            .map(|v| require("procedure", v))
            .transpose()?;
        let price = changes.price.map(|v| amount("price", v)).transpose()?;
        let discount = changes
            .discount
            .map(|v| amount("discount", v))
            .transpose()?;
        let final_price = changes
            .final_price
            .map(|v| amount("finalPrice", v))
            .transpose()?;

        if let Some(v) = changes.visit_date {
            self.visit_date = v;
        }
        if let Some(v) = patient_name {
            self.patient_name = v;
        }
        if let Some(v) = file_number {
            self.file_number = v;
        }
        if let Some(v) = changes.patient_type {
            self.patient_type = v;
        }
        if let Some(v) = procedure {
            self.procedure = v;
        }
        if let Some(v) = price {
            self.price = v;
        }
        if let Some(v) = discount {
            self.discount = v;
        }
        if let Some(v) = final_price {
            self.final_price = v;
        }
        if let Some(v) = changes.notes {
            self.notes = optional_text(Some(v));
        }
        Ok(())
    }
}

impl Record for Visit {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> NewVisit {
        NewVisit {
            visit_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            patient_name: "Sarah Johnson".into(),
            file_number: "P002".into(),
            patient_type: PatientType::Insurance,
            procedure: "Crown".into(),
            price: 1200.0,
            discount: Some(100.0),
            notes: None,
        }
    }

    #[test]
    fn test_final_price_floor() {
        assert_eq!(final_price(100.0, 30.0), 70.0);
        assert_eq!(final_price(100.0, 130.0), 0.0);
    }

    #[test]
    fn test_create_derives_final_price() {
        let visit = Visit::create(draft(), "v-1".into(), Utc::now()).unwrap();
        assert_eq!(visit.final_price, 1100.0);
        assert_eq!(visit.discount, 100.0);
    }

    #[test]
    fn test_create_discount_defaults_to_zero() {
        let mut d = draft();
        d.discount = None;
        let visit = Visit::create(d, "v-1".into(), Utc::now()).unwrap();
        assert_eq!(visit.discount, 0.0);
        assert_eq!(visit.final_price, 1200.0);
    }

    #[test]
    fn test_create_requires_visit_date() {
        let mut d = draft();
        d.visit_date = None;
        assert!(matches!(
            Visit::create(d, "v-1".into(), Utc::now()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_partial_discount_update_keeps_final_price() {
        let mut visit = Visit::create(draft(), "v-1".into(), Utc::now()).unwrap();

        visit
            .apply(VisitChanges {
                discount: Some(50.0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(visit.discount, 50.0);
        assert_eq!(visit.price, 1200.0);
        assert_eq!(visit.final_price, 1100.0);
        assert_eq!(visit.patient_name, "Sarah Johnson");
    }

    #[test]
    fn test_patient_type_parse() {
        assert_eq!("CASH".parse::<PatientType>().unwrap(), PatientType::Cash);
        assert!("card".parse::<PatientType>().is_err());
    }
}
