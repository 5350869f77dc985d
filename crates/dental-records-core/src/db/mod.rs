//! Persistence layer: whole collections stored under fixed keys.

mod collections;
mod memory;
mod schema;

pub use collections::*;
pub use memory::*;
pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned: {0}")]
    Lock(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Durable key-value storage for serialized collections.
///
/// Each call either completes or fails as a whole; callers never observe a
/// partially written payload.
pub trait CollectionStore {
    /// Fetch the payload stored under `key`, `None` on first run.
    fn load_raw(&self, key: &str) -> DbResult<Option<String>>;

    /// Replace the payload stored under `key`.
    fn save_raw(&self, key: &str, payload: &str) -> DbResult<()>;
}

/// SQLite-backed collection store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
