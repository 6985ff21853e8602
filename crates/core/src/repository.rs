//! In-memory record repository.
//!
//! The record set is fixed in cardinality once constructed: records are only ever mutated in
//! place, never added or removed. That lets the id index live outside the lock.
//!
//! ## Concurrency
//!
//! The simulator writes and request handlers read from different tasks, possibly on different
//! runtime threads. All record access goes through one `RwLock`, and [`RecordRepository::update_value`]
//! performs its read-modify-write of `(value, status, measured_at)` under the write guard, so a
//! reader never observes a half-applied update.

use crate::catalog::Catalog;
use crate::record::{BiomarkerRecord, PatientId, RecordId};
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
pub struct RecordRepository {
    records: RwLock<Vec<BiomarkerRecord>>,
    index: HashMap<RecordId, usize>,
}

impl RecordRepository {
    /// Builds a repository over `records`, preserving their order.
    ///
    /// Identifiers are expected to be unique; on a duplicate the first occurrence wins lookups.
    pub fn new(records: Vec<BiomarkerRecord>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            match index.entry(record.id()) {
                Entry::Vacant(slot) => {
                    slot.insert(position);
                }
                Entry::Occupied(_) => {
                    tracing::warn!("duplicate record id {} ignored by index", record.id());
                }
            }
        }

        Self {
            records: RwLock::new(records),
            index,
        }
    }

    /// Seeds a repository from `catalog` for the given patients.
    pub fn seeded(catalog: &Catalog, patient_ids: &[PatientId]) -> Self {
        Self::new(catalog.expand(patient_ids))
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn find_by_id(&self, id: RecordId) -> Option<BiomarkerRecord> {
        let position = *self.index.get(&id)?;
        self.read().get(position).cloned()
    }

    /// Returns the records of `patient_id` in insertion order.
    ///
    /// When `category` is given (and non-empty) only records whose category equals it
    /// case-insensitively are returned. Unknown patients or categories yield an empty vector.
    pub fn find_by_patient(
        &self,
        patient_id: PatientId,
        category: Option<&str>,
    ) -> Vec<BiomarkerRecord> {
        let category = category
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase);

        self.read()
            .iter()
            .filter(|r| r.patient_id() == patient_id)
            .filter(|r| category.as_deref().map_or(true, |c| r.category_matches(c)))
            .cloned()
            .collect()
    }

    /// Assigns a new value and timestamp to record `id` and recomputes its status.
    ///
    /// Returns the updated record, or `None` when no record has that id. Nothing is mutated in
    /// the `None` case.
    pub fn update_value(
        &self,
        id: RecordId,
        value: f64,
        measured_at: DateTime<Utc>,
    ) -> Option<BiomarkerRecord> {
        let position = *self.index.get(&id)?;
        let mut records = self.write();
        let record = records.get_mut(position)?;
        record.assign_value(value, measured_at);
        Some(record.clone())
    }

    /// Snapshot of every record.
    pub fn all(&self) -> Vec<BiomarkerRecord> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<BiomarkerRecord>> {
        // Each write leaves a record fully updated before the guard drops, so a poisoned lock
        // still holds consistent data.
        self.records
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<BiomarkerRecord>> {
        self.records
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
