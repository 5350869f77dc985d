//! Collection load/save operations.

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CollectionStore, Database, DbResult};

impl CollectionStore for Database {
    fn load_raw(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT payload FROM collections WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    fn save_raw(&self, key: &str, payload: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO collections (key, payload, record_count)
            VALUES (?1, ?2, COALESCE(json_array_length(?2), 0))
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                record_count = excluded.record_count,
                updated_at = datetime('now')
            "#,
            params![key, payload],
        )?;
        Ok(())
    }
}

/// One stored collection, without its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    pub key: String,
    pub record_count: i64,
    /// Last write time (SQLite `datetime('now')` format)
    pub updated_at: String,
}

impl Database {
    /// Every stored collection, ordered by key.
    pub fn collection_summaries(&self) -> DbResult<Vec<CollectionSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, record_count, updated_at FROM collections ORDER BY key",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CollectionSummary {
                key: row.get(0)?,
                record_count: row.get(1)?,
                updated_at: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

/// Load the records stored under `key`.
///
/// A missing key (first run) or a stored `null` yields an empty collection.
pub fn load_collection<R, S>(store: &S, key: &str) -> DbResult<Vec<R>>
where
    R: DeserializeOwned,
    S: CollectionStore + ?Sized,
{
    match store.load_raw(key)? {
        None => Ok(Vec::new()),
        Some(payload) => {
            let records: Option<Vec<R>> = serde_json::from_str(&payload)?;
            Ok(records.unwrap_or_default())
        }
    }
}

/// Replace the records stored under `key`.
pub fn save_collection<R, S>(store: &S, key: &str, records: &[R]) -> DbResult<()>
where
    R: Serialize,
    S: CollectionStore + ?Sized,
{
    let payload = serde_json::to_string(records)?;
    store.save_raw(key, &payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewPatient, Patient};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn make_patient(first: &str) -> Patient {
        Patient::create(
            NewPatient {
                first_name: first.into(),
                last_name: "Smith".into(),
                phone: "555-0123".into(),
                ..Default::default()
            },
            format!("id-{}", first),
            chrono::Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_missing_key_is_empty() {
        let db = setup_db();
        let patients: Vec<Patient> = load_collection(&db, "dentalPatients").unwrap();
        assert!(patients.is_empty());
    }

    #[test]
    fn test_null_payload_is_empty() {
        let db = setup_db();
        db.save_raw("dentalPatients", "null").unwrap();
        let patients: Vec<Patient> = load_collection(&db, "dentalPatients").unwrap();
        assert!(patients.is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let db = setup_db();

        let mut john = make_patient("John");
        john.email = Some("john@example.com".into());
        john.next_appointment = chrono::NaiveDate::from_ymd_opt(2024, 5, 15);
        let records = vec![john, make_patient("Jane")];

        save_collection(&db, "dentalPatients", &records).unwrap();
        let loaded: Vec<Patient> = load_collection(&db, "dentalPatients").unwrap();

        assert_eq!(loaded, records);
    }

    #[test]
    fn test_save_overwrites() {
        let db = setup_db();

        save_collection(&db, "dentalPatients", &[make_patient("John")]).unwrap();
        save_collection::<Patient, _>(&db, "dentalPatients", &[]).unwrap();

        let loaded: Vec<Patient> = load_collection(&db, "dentalPatients").unwrap();
        assert!(loaded.is_empty());

        let summaries = db.collection_summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].key, "dentalPatients");
        assert_eq!(summaries[0].record_count, 0);
        assert!(!summaries[0].updated_at.is_empty());
    }

    #[test]
    fn test_record_count_follows_payload() {
        let db = setup_db();

        save_collection(
            &db,
            "dentalPatients",
            &[make_patient("John"), make_patient("Jane")],
        )
        .unwrap();
        db.save_raw("dentalVisits", "null").unwrap();

        let counts: Vec<_> = db
            .collection_summaries()
            .unwrap()
            .into_iter()
            .map(|s| (s.key, s.record_count))
            .collect();
        assert_eq!(
            counts,
            vec![("dentalPatients".to_string(), 2), ("dentalVisits".to_string(), 0)]
        );

        save_collection(&db, "dentalPatients", &[make_patient("John")]).unwrap();
        assert_eq!(db.collection_summaries().unwrap()[0].record_count, 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let db = setup_db();

        save_collection(&db, "dentalPatients", &[make_patient("John")]).unwrap();

        let other: Vec<Patient> = load_collection(&db, "dentalVisits").unwrap();
        assert!(other.is_empty());
    }
}
