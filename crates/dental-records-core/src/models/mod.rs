//! Domain models for the dental office record manager.

mod patient;
mod visit;

pub use patient::*;
pub use visit::*;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};

/// Shape shared by every stored record.
pub trait Record {
    /// Opaque unique identifier, immutable once assigned.
    fn id(&self) -> &str;

    /// Creation timestamp, immutable once assigned.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Trim a required text field, rejecting blank input.
pub(crate) fn require(field: &str, value: String) -> CoreResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::missing(field));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field; blank input becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate a currency amount (finite, non-negative).
pub(crate) fn amount(field: &str, value: f64) -> CoreResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{} must be a non-negative amount, got {}",
            field, value
        )));
    }
    Ok(value)
}

/// Serde adapter for optional calendar dates.
///
/// Accepts `null`, a missing field, an empty string (what a cleared browser
/// date input stores) or `YYYY-MM-DD`. Always writes `YYYY-MM-DD` or `null`.
pub(crate) mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_require_trims() {
        assert_eq!(require("firstName", "  Ana ".into()).unwrap(), "Ana");
        assert!(matches!(
            require("firstName", "   ".into()),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" a@b.c ".into())), Some("a@b.c".into()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_amount_rejects_negative_and_nan() {
        assert!(amount("price", -1.0).is_err());
        assert!(amount("price", f64::NAN).is_err());
        assert_eq!(amount("price", 0.0).unwrap(), 0.0);
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Dated {
        #[serde(default, with = "optional_date")]
        date: Option<NaiveDate>,
    }

    #[test]
    fn test_blank_date_is_written_back_as_null() {
        let loaded: Dated = serde_json::from_str(r#"{"date": "  "}"#).unwrap();
        assert_eq!(loaded.date, None);
        assert_eq!(serde_json::to_string(&loaded).unwrap(), r#"{"date":null}"#);

        let loaded: Dated = serde_json::from_str(r#"{"date": "2024-03-01"}"#).unwrap();
        assert_eq!(serde_json::to_string(&loaded).unwrap(), r#"{"date":"2024-03-01"}"#);

        assert!(serde_json::from_str::<Dated>(r#"{"date": "03/01/2024"}"#).is_err());
    }
}
