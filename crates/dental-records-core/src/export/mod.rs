//! Export and import of whole collections.

mod csv;

pub use csv::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Export format version.
pub const EXPORT_FORMAT_VERSION: &str = "1";

/// Export metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// Export format version
    pub format_version: String,
    /// Storage key the records came from
    pub collection: String,
    /// Export timestamp
    pub exported_at: String,
    pub total_records: usize,
}

/// Snapshot of a full collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionExport<R> {
    pub metadata: ExportMetadata,
    pub records: Vec<R>,
}

impl<R: Clone> CollectionExport<R> {
    /// Snapshot `records` (creation order) from the collection `key`.
    pub fn new(key: &str, records: &[R]) -> Self {
        Self {
            metadata: ExportMetadata {
                format_version: EXPORT_FORMAT_VERSION.to_string(),
                collection: key.to_string(),
                exported_at: chrono::Utc::now().to_rfc3339(),
                total_records: records.len(),
            },
            records: records.to_vec(),
        }
    }
}

impl<R: Serialize> CollectionExport<R> {
    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<R: CsvRow> CollectionExport<R> {
    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(&R::HEADER.join(","));
        csv.push('\n');

        for record in &self.records {
            let fields: Vec<String> = record.csv_fields().iter().map(|f| escape_csv(f)).collect();
            csv.push_str(&fields.join(","));
            csv.push('\n');
        }

        csv
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportPayload<R> {
    /// Raw browser storage value: a bare JSON array
    Bare(Vec<R>),
    /// A [`CollectionExport`] document
    Export { records: Vec<R> },
}

/// Parse records for import.
///
/// Accepts either a bare JSON array (what the browser stored under its key)
/// or a document produced by [`CollectionExport::to_json`].
pub fn parse_import<R: DeserializeOwned>(json: &str) -> DbResult<Vec<R>> {
    let payload: ImportPayload<R> = serde_json::from_str(json)?;
    Ok(match payload {
        ImportPayload::Bare(records) => records,
        ImportPayload::Export { records } => records,
    })
}
