//! In-process collection store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{CollectionStore, DbError, DbResult};

/// Collection store kept in memory. Nothing survives the process.
///
/// A read-only store refuses every save with [`DbError::Unavailable`], which
/// is how a full or locked browser storage behaves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose saves always fail.
    pub fn read_only() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            read_only: true,
        }
    }

    /// Pre-populate a key, bypassing the read-only flag.
    pub fn with_entry(self, key: &str, payload: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), payload.to_string());
        }
        self
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}

impl CollectionStore for MemoryStore {
    fn load_raw(&self, key: &str) -> DbResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| DbError::Lock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save_raw(&self, key: &str, payload: &str) -> DbResult<()> {
        if self.read_only {
            return Err(DbError::Unavailable(format!(
                "store is read-only, cannot save {}",
                key
            )));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| DbError::Lock(e.to_string()))?;
        entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
