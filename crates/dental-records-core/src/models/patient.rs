//! Patient models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, require, Record};
use crate::error::{CoreError, CoreResult};

/// Patient account status. Set to `Active` at creation and only changed by
/// an explicit update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatientStatus {
    #[default]
    Active,
    Inactive,
}

impl PatientStatus {
    /// Storage form (`"active"` / `"inactive"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "active",
            PatientStatus::Inactive => "inactive",
        }
    }

    /// Capitalized label for display.
    pub fn label(&self) -> &'static str {
        match self {
            PatientStatus::Active => "Active",
            PatientStatus::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(PatientStatus::Active),
            "inactive" => Ok(PatientStatus::Inactive),
            other => Err(CoreError::Validation(format!(
                "unknown patient status: {}",
                other
            ))),
        }
    }
}

/// A patient record as held by the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Unique identifier - assigned at creation
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "super::optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub insurance_provider: Option<String>,
    #[serde(default)]
    pub insurance_number: Option<String>,
    #[serde(default)]
    pub status: PatientStatus,
    /// Creation timestamp - never changes
    pub created_at: DateTime<Utc>,
    /// Set externally; no appointment subsystem writes it
    #[serde(default, with = "super::optional_date")]
    pub last_visit: Option<NaiveDate>,
    /// Set externally; no appointment subsystem writes it
    #[serde(default, with = "super::optional_date")]
    pub next_appointment: Option<NaiveDate>,
}

/// Fields supplied when registering a new patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, with = "super::optional_date")]
    pub date_of_birth: Option<NaiveDate>,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub insurance_provider: Option<String>,
    #[serde(default)]
    pub insurance_number: Option<String>,
}

/// Partial update for a patient. `None` leaves the stored value alone.
///
/// Optional text fields are cleared by supplying a blank string; optional
/// dates are cleared with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Option<NaiveDate>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub medical_history: Option<String>,
    pub insurance_provider: Option<String>,
    pub insurance_number: Option<String>,
    pub status: Option<PatientStatus>,
    pub last_visit: Option<Option<NaiveDate>>,
    pub next_appointment: Option<Option<NaiveDate>>,
}

impl PatientChanges {
    /// True when no field is supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Patient {
    /// Build a new patient from validated input.
    ///
    /// Required: first name, last name, phone (non-blank after trimming).
    pub fn create(draft: NewPatient, id: String, now: DateTime<Utc>) -> CoreResult<Self> {
        Ok(Self {
            id,
            first_name: require("firstName", draft.first_name)?,
            last_name: require("lastName", draft.last_name)?,
            date_of_birth: draft.date_of_birth,
            phone: require("phone", draft.phone)?,
            email: optional_text(draft.email),
            address: optional_text(draft.address),
            medical_history: optional_text(draft.medical_history),
            insurance_provider: optional_text(draft.insurance_provider),
            insurance_number: optional_text(draft.insurance_number),
            status: PatientStatus::Active,
            created_at: now,
            last_visit: None,
            next_appointment: None,
        })
    }

    /// Merge `changes` over this record. `id` and `created_at` are untouched.
    ///
    /// Validation happens before any field is written, so a rejected update
    /// leaves the record exactly as it was.
    pub fn apply(&mut self, changes: PatientChanges) -> CoreResult<()> {
        let first_name = changes
            .first_name
            .map(|v| require("firstName", v))
            .transpose()?;
        let last_name = changes
            .last_name
            .map(|v| require("lastName", v))
            .transpose()?;
        let phone = changes.phone.map(|v| require("phone", v)).transpose()?;

        if let Some(v) = first_name {
            self.first_name = v;
        }
        if let Some(v) = last_name {
            self.last_name = v;
        }
        if let Some(v) = phone {
            self.phone = v;
        }
        if let Some(v) = changes.date_of_birth {
            self.date_of_birth = v;
        }
        if let Some(v) = changes.email {
            self.email = optional_text(Some(v));
        }
        if let Some(v) = changes.address {
            self.address = optional_text(Some(v));
        }
        if let Some(v) = changes.medical_history {
            self.medical_history = optional_text(Some(v));
        }
        if let Some(v) = changes.insurance_provider {
            self.insurance_provider = optional_text(Some(v));
        }
        if let Some(v) = changes.insurance_number {
            self.insurance_number = optional_text(Some(v));
        }
        if let Some(v) = changes.status {
            self.status = v;
        }
        if let Some(v) = changes.last_visit {
            self.last_visit = v;
        }
        if let Some(v) = changes.next_appointment {
            self.next_appointment = v;
        }
        Ok(())
    }

    /// "First Last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_active(&self) -> bool {
        self.status == PatientStatus::Active
    }
}

impl Record for Patient {
    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
