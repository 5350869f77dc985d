//! Create, update and delete, with identity assignment and persistence.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use super::RecordBook;
use crate::db::{CollectionStore, DbError};
use crate::error::{CoreError, CoreResult};
use crate::models::{NewPatient, NewVisit, Patient, PatientChanges, Visit, VisitChanges};
use crate::query::Queryable;

/// Entity-specific half of the lifecycle.
pub trait Managed: Queryable + Serialize + DeserializeOwned {
    /// Input for creation.
    type Draft;
    /// Partial input for updates.
    type Changes;

    /// Human name used in notices ("Patient", "Visit record").
    const LABEL: &'static str;

    /// Validate `draft` and build a record with the given identity.
    fn create(draft: Self::Draft, id: String, now: DateTime<Utc>) -> CoreResult<Self>;

    /// Merge `changes` over the record; must leave `id` and `created_at` alone.
    fn apply(&mut self, changes: Self::Changes) -> CoreResult<()>;

    /// Give an imported record a new identity after an id collision.
    fn reassign_id(&mut self, id: String);
}

impl Managed for Patient {
    type Draft = NewPatient;
    type Changes = PatientChanges;

    const LABEL: &'static str = "Patient";

    fn create(draft: NewPatient, id: String, now: DateTime<Utc>) -> CoreResult<Self> {
        Patient::create(draft, id, now)
    }

    fn apply(&mut self, changes: PatientChanges) -> CoreResult<()> {
        Patient::apply(self, changes)
    }

    fn reassign_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Managed for Visit {
    type Draft = NewVisit;
    type Changes = VisitChanges;

    const LABEL: &'static str = "Visit record";

    fn create(draft: NewVisit, id: String, now: DateTime<Utc>) -> CoreResult<Self> {
        Visit::create(draft, id, now)
    }

    fn apply(&mut self, changes: VisitChanges) -> CoreResult<()> {
        Visit::apply(self, changes)
    }

    fn reassign_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A mutation that has been applied in memory.
///
/// `save_error` is set when persisting the collection afterwards failed. The
/// in-memory change is kept either way.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    pub save_error: Option<DbError>,
}

impl<T> Applied<T> {
    /// Whether the change also reached the store.
    pub fn is_durable(&self) -> bool {
        self.save_error.is_none()
    }

    /// Turn a failed save into an error, dropping the value.
    pub fn into_result(self) -> CoreResult<T> {
        match self.save_error {
            None => Ok(self.value),
            Some(e) => Err(CoreError::Persistence(e)),
        }
    }
}

impl<R: Managed> RecordBook<R> {
    /// Validate and append a new record.
    ///
    /// Assigns a fresh id and `created_at`, persists the collection and
    /// recomputes the view. Validation failures leave everything unchanged.
    pub fn create<S: CollectionStore + ?Sized>(
        &mut self,
        draft: R::Draft,
        store: &S,
    ) -> CoreResult<Applied<R>> {
        let record = R::create(draft, self.fresh_id(), Utc::now())?;
        self.records.push(record.clone());
        info!(key = %self.key(), id = %record.id(), "record created");
        Ok(self.commit(store, record))
    }

    /// Merge `changes` over the record with `id`.
    pub fn update<S: CollectionStore + ?Sized>(
        &mut self,
        id: &str,
        changes: R::Changes,
        store: &S,
    ) -> CoreResult<Applied<R>> {
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| CoreError::NotFound(format!("{} in {}", id, self.key())))?;

        // Work on a copy so a rejected update writes nothing
        let mut updated = self.records[index].clone();
        updated.apply(changes)?;
        self.records[index] = updated.clone();

        info!(key = %self.key(), id = %id, "record updated");
        Ok(self.commit(store, updated))
    }

    /// Remove the record with `id`. Unknown ids are a no-op.
    ///
    /// The value is `true` when a record was removed.
    pub fn delete<S: CollectionStore + ?Sized>(&mut self, id: &str, store: &S) -> Applied<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        let removed = self.records.len() != before;

        if removed {
            info!(key = %self.key(), id = %id, "record deleted");
        }
        self.commit(store, removed)
    }

    /// Append already-built records (seed data, imports).
    ///
    /// Ids that collide with held records, or with each other, are replaced.
    /// Returns how many records were appended.
    pub fn append<S: CollectionStore + ?Sized>(
        &mut self,
        records: Vec<R>,
        store: &S,
    ) -> Applied<usize> {
        let count = records.len();
        for mut record in records {
            if self.contains(record.id()) || record.id().trim().is_empty() {
                let id = self.fresh_id();
                record.reassign_id(id);
            }
            self.records.push(record);
        }
        info!(key = %self.key(), count, "records appended");
        self.commit(store, count)
    }

    /// Persist, then rebuild the view. The view is rebuilt even when the
    /// save fails.
    fn commit<S: CollectionStore + ?Sized, T>(&mut self, store: &S, value: T) -> Applied<T> {
        let save_error = self.save(store).err();
        if let Some(e) = &save_error {
            warn!(key = %self.key(), error = %e, "collection not persisted");
        }
        self.refresh();
        Applied { value, save_error }
    }

    /// Random v4 id not used by any held record.
    fn fresh_id(&self) -> String {
        loop {
            let id = uuid::Uuid::new_v4().to_string();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}
