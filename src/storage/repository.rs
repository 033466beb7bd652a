//! Generic record repository for JSON storage
//!
//! Each collection is persisted as a plain JSON array in insertion order.
//! Records are held in memory behind a `RwLock` and written back with
//! `write_json_atomic`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BackofficeError;
use crate::models::{
    Invoice, InvoiceId, LaborId, LaborItem, MaterialId, MaterialItem, Task, TaskId,
};

use super::file_io::{read_json_or_recover, write_json_atomic};

/// A record that can be kept in a [`Repository`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Eq + fmt::Display;

    /// Human-readable entity name used in error messages
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    /// Whether a user-supplied identifier refers to this record
    fn id_matches(&self, query: &str) -> bool;
}

impl Record for LaborItem {
    type Id = LaborId;
    const ENTITY: &'static str = "Labor entry";

    fn id(&self) -> LaborId {
        self.id
    }

    fn id_matches(&self, query: &str) -> bool {
        self.id.matches(query)
    }
}

impl Record for MaterialItem {
    type Id = MaterialId;
    const ENTITY: &'static str = "Material";

    fn id(&self) -> MaterialId {
        self.id
    }

    fn id_matches(&self, query: &str) -> bool {
        self.id.matches(query)
    }
}

impl Record for Task {
    type Id = TaskId;
    const ENTITY: &'static str = "Task";

    fn id(&self) -> TaskId {
        self.id
    }

    fn id_matches(&self, query: &str) -> bool {
        self.id.matches(query)
    }
}

impl Record for Invoice {
    type Id = InvoiceId;
    const ENTITY: &'static str = "Invoice";

    fn id(&self) -> InvoiceId {
        self.id
    }

    /// Invoices can also be looked up by their invoice number
    fn id_matches(&self, query: &str) -> bool {
        self.id.matches(query) || self.invoice_number.eq_ignore_ascii_case(query.trim())
    }
}

fn lock_error(e: impl fmt::Display, kind: &str) -> BackofficeError {
    BackofficeError::Storage(format!("Failed to acquire {} lock: {}", kind, e))
}

/// Repository for one persisted collection
pub struct Repository<T: Record> {
    path: PathBuf,
    data: RwLock<Vec<T>>,
}

impl<T: Record> Repository<T> {
    /// Create a new, empty repository backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load records from disk
    ///
    /// Returns a notice when the file was corrupt and has been moved aside.
    pub fn load(&self) -> Result<Option<String>, BackofficeError> {
        let (records, notice): (Vec<T>, _) = read_json_or_recover(&self.path)?;

        let mut data = self.data.write().map_err(|e| lock_error(e, "write"))?;
        *data = records;

        Ok(notice)
    }

    /// Save records to disk
    pub fn save(&self) -> Result<(), BackofficeError> {
        let data = self.data.read().map_err(|e| lock_error(e, "read"))?;
        write_json_atomic(&self.path, &*data)
    }

    /// Get a record by ID
    pub fn get(&self, id: T::Id) -> Result<Option<T>, BackofficeError> {
        let data = self.data.read().map_err(|e| lock_error(e, "read"))?;
        Ok(data.iter().find(|r| r.id() == id).cloned())
    }

    /// Get all records in insertion order
    pub fn get_all(&self) -> Result<Vec<T>, BackofficeError> {
        let data = self.data.read().map_err(|e| lock_error(e, "read"))?;
        Ok(data.clone())
    }

    /// Resolve a user-supplied identifier to exactly one record
    pub fn find(&self, query: &str) -> Result<T, BackofficeError> {
        let data = self.data.read().map_err(|e| lock_error(e, "read"))?;

        let matches: Vec<&T> = data.iter().filter(|r| r.id_matches(query)).collect();
        match matches.as_slice() {
            [record] => Ok((*record).clone()),
            [] => Err(BackofficeError::NotFound {
                entity_type: T::ENTITY,
                identifier: query.to_string(),
            }),
            many => Err(BackofficeError::AmbiguousId {
                entity_type: T::ENTITY,
                identifier: query.to_string(),
                matches: many.len(),
            }),
        }
    }

    /// Insert a new record or replace the one with the same ID in place
    pub fn upsert(&self, record: T) -> Result<(), BackofficeError> {
        let mut data = self.data.write().map_err(|e| lock_error(e, "write"))?;

        match data.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => data.push(record),
        }
        Ok(())
    }

    /// Append a batch of records
    pub fn append(&self, records: Vec<T>) -> Result<(), BackofficeError> {
        let mut data = self.data.write().map_err(|e| lock_error(e, "write"))?;
        data.extend(records);
        Ok(())
    }

    /// Delete a record, returning whether it existed
    pub fn delete(&self, id: T::Id) -> Result<bool, BackofficeError> {
        let mut data = self.data.write().map_err(|e| lock_error(e, "write"))?;

        let before = data.len();
        data.retain(|r| r.id() != id);
        Ok(data.len() != before)
    }

    /// Remove every record
    pub fn clear(&self) -> Result<(), BackofficeError> {
        let mut data = self.data.write().map_err(|e| lock_error(e, "write"))?;
        data.clear();
        Ok(())
    }

    /// Apply `f` to every record, returning how many it reported as changed
    pub fn modify<F>(&self, mut f: F) -> Result<usize, BackofficeError>
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut data = self.data.write().map_err(|e| lock_error(e, "write"))?;

        let mut changed = 0;
        for record in data.iter_mut() {
            if f(record) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Number of records
    pub fn count(&self) -> Result<usize, BackofficeError> {
        let data = self.data.read().map_err(|e| lock_error(e, "read"))?;
        Ok(data.len())
    }
}
