//! Visit search, filter and sort rules.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{compare_names, contains_folded, newest_first, Queryable};
use crate::error::CoreError;
use crate::models::{PatientType, Visit};

/// Sort orders offered for the visit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitSortKey {
    /// Patient name, case-folded
    Name,
    /// Newest `created_at` first
    Date,
}

impl FromStr for VisitSortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(VisitSortKey::Name),
            "date" => Ok(VisitSortKey::Date),
            other => Err(CoreError::Validation(format!(
                "unknown visit sort key: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for VisitSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VisitSortKey::Name => "name",
            VisitSortKey::Date => "date",
        })
    }
}

impl Queryable for Visit {
    type Category = PatientType;
    type SortKey = VisitSortKey;

    fn matches_search(&self, needle: &str) -> bool {
        contains_folded(&self.patient_name, needle)
            || contains_folded(&self.file_number, needle)
            || contains_folded(&self.procedure, needle)
    }

    fn category(&self) -> PatientType {
        self.patient_type
    }

    fn compare(&self, other: &Self, key: VisitSortKey) -> Ordering {
        match key {
            VisitSortKey::Name => compare_names(&self.patient_name, &other.patient_name),
            VisitSortKey::Date => newest_first(&self.created_at, &other.created_at),
        }
    }
}
