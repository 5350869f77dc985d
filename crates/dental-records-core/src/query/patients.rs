//! Patient search, filter and sort rules.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{compare_names, contains_folded, newest_first, Queryable};
use crate::error::CoreError;
use crate::format::digits_only;
use crate::models::{Patient, PatientStatus};

/// Sort orders offered for the patient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientSortKey {
    /// "First Last", case-folded
    Name,
    /// Newest `created_at` first
    Date,
    /// Newest `last_visit` first, never-visited last
    LastVisit,
}

impl FromStr for PatientSortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(PatientSortKey::Name),
            "date" => Ok(PatientSortKey::Date),
            "lastvisit" | "last-visit" | "last_visit" => Ok(PatientSortKey::LastVisit),
            other => Err(CoreError::Validation(format!(
                "unknown patient sort key: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for PatientSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PatientSortKey::Name => "name",
            PatientSortKey::Date => "date",
            PatientSortKey::LastVisit => "lastVisit",
        })
    }
}

/// Whether the search text looks like a phone number fragment.
fn is_phone_like(needle: &str) -> bool {
    needle.chars().any(|c| c.is_ascii_digit())
        && needle
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '.' | '+'))
}

impl Queryable for Patient {
    type Category = PatientStatus;
    type SortKey = PatientSortKey;

    fn matches_search(&self, needle: &str) -> bool {
        if contains_folded(&self.first_name, needle)
            || contains_folded(&self.last_name, needle)
            || self.phone.contains(needle)
        {
            return true;
        }

        // "5550123" finds "555-0123" and the other way round
        if is_phone_like(needle) && digits_only(&self.phone).contains(&digits_only(needle)) {
            return true;
        }

        self.email
            .as_deref()
            .is_some_and(|email| contains_folded(email, needle))
    }

    fn category(&self) -> PatientStatus {
        self.status
    }

    fn compare(&self, other: &Self, key: PatientSortKey) -> Ordering {
        match key {
            PatientSortKey::Name => compare_names(&self.full_name(), &other.full_name()),
            PatientSortKey::Date => newest_first(&self.created_at, &other.created_at),
            PatientSortKey::LastVisit => match (self.last_visit, other.last_visit) {
                (Some(a), Some(b)) => newest_first(&a, &b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}
