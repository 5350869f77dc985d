//! SQLite schema definition.

/// Schema for the collection store. One row per collection key, payload is
/// the JSON array of records.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS collections (
    key TEXT PRIMARY KEY,
    payload TEXT NOT NULL DEFAULT '[]',           -- JSON array of records
    record_count INTEGER NOT NULL DEFAULT 0,      -- array length of payload
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Payloads must stay valid JSON
CREATE TRIGGER IF NOT EXISTS collections_check_payload BEFORE INSERT ON collections
BEGIN
    SELECT CASE
        WHEN json_valid(new.payload) = 0 THEN
            RAISE(ABORT, 'Collection payload must be valid JSON')
    END;
END;

CREATE TRIGGER IF NOT EXISTS collections_check_payload_update BEFORE UPDATE ON collections
BEGIN
    SELECT CASE
        WHEN json_valid(new.payload) = 0 THEN
            RAISE(ABORT, 'Collection payload must be valid JSON')
    END;
END;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_invalid_payload_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO collections (key, payload) VALUES ('dentalVisits', 'not json')",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO collections (key, payload) VALUES ('dentalVisits', '[]')",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_record_count_defaults_to_zero() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute("INSERT INTO collections (key) VALUES ('dentalVisits')", [])
            .unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT record_count FROM collections WHERE key = 'dentalVisits'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
    }
}
