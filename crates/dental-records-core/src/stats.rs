//! Aggregate statistics, always computed over the full collection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Patient, PatientType, Visit};

/// Inputs that aggregates depend on besides the records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsContext {
    pub today: NaiveDate,
    /// Simulated average monthly revenue per registered patient
    pub revenue_per_patient: f64,
}

/// Collections that can summarize themselves for the dashboard.
pub trait Summarize: Sized {
    type Stats: std::fmt::Debug + Clone + PartialEq;

    fn summarize(records: &[Self], ctx: &StatsContext) -> Self::Stats;
}

/// Patient registry dashboard numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientStats {
    pub total_patients: usize,
    pub active_patients: usize,
    /// Next appointment is today
    pub today_appointments: usize,
    /// Next appointment is after today
    pub pending_appointments: usize,
    /// Simulated: patients × revenue per patient
    pub monthly_revenue: f64,
}

impl Summarize for Patient {
    type Stats = PatientStats;

    fn summarize(patients: &[Patient], ctx: &StatsContext) -> PatientStats {
        let today = Some(ctx.today);
        PatientStats {
            total_patients: patients.len(),
            active_patients: patients.iter().filter(|p| p.is_active()).count(),
            today_appointments: patients
                .iter()
                .filter(|p| p.next_appointment == today)
                .count(),
            pending_appointments: patients
                .iter()
                .filter(|p| p.next_appointment.is_some_and(|d| d > ctx.today))
                .count(),
            monthly_revenue: patients.len() as f64 * ctx.revenue_per_patient,
        }
    }
}

/// Visit ledger dashboard numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitStats {
    pub total_visits: usize,
    /// Visit date is today
    pub today_visits: usize,
    pub cash_patients: usize,
    pub insurance_patients: usize,
    /// Sum of final prices
    pub total_revenue: f64,
    pub total_discounts: f64,
}

impl Summarize for Visit {
    type Stats = VisitStats;

    fn summarize(visits: &[Visit], ctx: &StatsContext) -> VisitStats {
        let count_type = |kind: PatientType| visits.iter().filter(|v| v.patient_type == kind).count();
        VisitStats {
            total_visits: visits.len(),
            today_visits: visits.iter().filter(|v| v.visit_date == ctx.today).count(),
            cash_patients: count_type(PatientType::Cash),
            insurance_patients: count_type(PatientType::Insurance),
            total_revenue: visits.iter().map(|v| v.final_price).sum(),
            total_discounts: visits.iter().map(|v| v.discount).sum(),
        }
    }
}
