//! Full collection plus its derived view.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::db::{load_collection, save_collection, CollectionStore, DbResult};
use crate::error::{CoreError, CoreResult};
use crate::query::{Filter, Query, Queryable};

/// One record collection stored under a fixed key.
///
/// `records` is the source of truth in creation order. `view` is always
/// `query.run(&records)`; it is rebuilt after every change and never edited
/// directly.
pub struct RecordBook<R: Queryable> {
    key: String,
    pub(super) records: Vec<R>,
    view: Vec<R>,
    query: Query<R>,
}

impl<R> RecordBook<R>
where
    R: Queryable + Serialize + DeserializeOwned,
{
    /// Create an empty book bound to a storage key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            records: Vec::new(),
            view: Vec::new(),
            query: Query::default(),
        }
    }

    /// Storage key of this collection.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Replace the held collection with what the store has under our key.
    /// Returns the number of records loaded.
    pub fn load<S: CollectionStore + ?Sized>(&mut self, store: &S) -> DbResult<usize> {
        self.records = load_collection(store, &self.key)?;
        self.refresh();
        Ok(self.records.len())
    }

    /// Write the full collection under our key.
    pub fn save<S: CollectionStore + ?Sized>(&self, store: &S) -> DbResult<()> {
        save_collection(store, &self.key, &self.records)
    }

    /// Full collection, creation order.
    pub fn all(&self) -> &[R] {
        &self.records
    }

    /// Current view.
    pub fn view(&self) -> &[R] {
        &self.view
    }

    pub fn query(&self) -> &Query<R> {
        &self.query
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look a record up by id.
    pub fn get(&self, id: &str) -> CoreResult<&R> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| CoreError::NotFound(format!("{} in {}", id, self.key)))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    /// Change the search text and recompute the view.
    pub fn set_search(&mut self, text: impl Into<String>) -> &[R] {
        self.query.search = text.into();
        self.refresh();
        &self.view
    }

    /// Change the category filter and recompute the view.
    pub fn set_filter(&mut self, filter: Filter<R::Category>) -> &[R] {
        self.query.filter = filter;
        self.refresh();
        &self.view
    }

    /// Change the sort key and recompute the view.
    pub fn set_sort(&mut self, key: Option<R::SortKey>) -> &[R] {
        self.query.sort = key;
        self.refresh();
        &self.view
    }

    /// Rebuild the view from the full collection and the active query.
    pub fn refresh(&mut self) {
        let view = self.query.run(&self.records);
        self.replace_view(view);
    }

    fn replace_view(&mut self, view: Vec<R>) {
        debug!(
            key = %self.key,
            total = self.records.len(),
            shown = view.len(),
            query = ?self.query,
            "view recomputed"
        );
        self.view = view;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{NewPatient, Patient, PatientStatus};
    use crate::query::PatientSortKey;

    fn book_with(names: &[&str]) -> RecordBook<Patient> {
        let mut book = RecordBook::new("dentalPatients");
        for (i, name) in names.iter().enumerate() {
            let patient = Patient::create(
                NewPatient {
                    first_name: name.to_string(),
                    last_name: "Test".into(),
                    phone: "555-0100".into(),
                    ..Default::default()
                },
                format!("p-{}", i),
                chrono::Utc::now(),
            )
            .unwrap();
            book.records.push(patient);
        }
        book.refresh();
        book
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = MemoryStore::new();
        let mut book: RecordBook<Patient> = RecordBook::new("dentalPatients");
        assert_eq!(book.load(&store).unwrap(), 0);
        assert!(book.all().is_empty());
        assert!(book.view().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let book = book_with(&["Zed", "Amy"]);
        book.save(&store).unwrap();

        let mut reloaded: RecordBook<Patient> = RecordBook::new("dentalPatients");
        reloaded.load(&store).unwrap();
        assert_eq!(reloaded.all(), book.all());
    }

    #[test]
    fn test_view_follows_query_state() {
        let mut book = book_with(&["Zed", "Amy", "Bob"]);

        assert_eq!(book.set_search("amy").len(), 1);
        assert_eq!(book.set_search("").len(), 3);

        let names: Vec<_> = book
            .set_sort(Some(PatientSortKey::Name))
            .iter()
            .map(|p| p.first_name.clone())
            .collect();
        assert_eq!(names, vec!["Amy", "Bob", "Zed"]);

        assert!(book
            .set_filter(Filter::Only(PatientStatus::Inactive))
            .is_empty());

        // full collection keeps creation order regardless of the view
        assert_eq!(book.all()[0].first_name, "Zed");
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let book = book_with(&["Amy"]);
        assert!(book.get("p-0").is_ok());
        assert!(matches!(book.get("nope"), Err(CoreError::NotFound(_))));
    }
}
