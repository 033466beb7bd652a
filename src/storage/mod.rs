//! Storage layer for the back-office ledger
//!
//! Provides JSON file storage with atomic writes, recovery from corrupt
//! files, and an append-only audit trail for every mutation.

pub mod file_io;
pub mod repository;

pub use file_io::{read_json_or_recover, write_json_atomic};
pub use repository::{Record, Repository};

use serde::Serialize;

use crate::audit::{field_changes, Action, AuditEntry, AuditLogger};
use crate::config::paths::BackofficePaths;
use crate::error::BackofficeError;
use crate::models::{CollectionKind, Invoice, LaborItem, MaterialItem, Task};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BackofficePaths,
    pub labor: Repository<LaborItem>,
    pub materials: Repository<MaterialItem>,
    pub tasks: Repository<Task>,
    pub invoices: Repository<Invoice>,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BackofficePaths) -> Result<Self, BackofficeError> {
        // Ensure directories exist
        paths.ensure_directories()?;

        Ok(Self {
            labor: Repository::new(paths.labor_file()),
            materials: Repository::new(paths.materials_file()),
            tasks: Repository::new(paths.tasks_file()),
            invoices: Repository::new(paths.invoices_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &BackofficePaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    ///
    /// Returns one notice per collection that had to be recovered.
    pub fn load_all(&self) -> Result<Vec<String>, BackofficeError> {
        let notices = [
            self.labor.load()?,
            self.materials.load()?,
            self.tasks.load()?,
            self.invoices.load()?,
        ];
        Ok(notices.into_iter().flatten().collect())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), BackofficeError> {
        self.labor.save()?;
        self.materials.save()?;
        self.tasks.save()?;
        self.invoices.save()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a newly created record
    pub fn log_create<T: Serialize>(
        &self,
        collection: CollectionKind,
        record_id: String,
        label: String,
        record: &T,
    ) -> Result<(), BackofficeError> {
        self.audit
            .append(&[AuditEntry::created(collection, record_id, label, record)])
    }

    /// Record an edit as the list of fields it changed
    ///
    /// Edits that change nothing are not logged.
    pub fn log_update<T: Serialize>(
        &self,
        collection: CollectionKind,
        record_id: String,
        label: String,
        before: &T,
        after: &T,
    ) -> Result<(), BackofficeError> {
        let changes = field_changes(before, after)?;
        if changes.is_empty() {
            return Ok(());
        }
        self.audit
            .append(&[AuditEntry::updated(collection, record_id, label, changes)])
    }

    /// Record a single deleted record
    pub fn log_delete<T: Serialize>(
        &self,
        collection: CollectionKind,
        record_id: String,
        label: String,
        record: &T,
    ) -> Result<(), BackofficeError> {
        self.audit
            .append(&[AuditEntry::deleted(collection, record_id, label, record)])
    }

    /// Record an import or clear as one entry listing the affected ids
    pub fn log_bulk(
        &self,
        action: Action,
        collection: CollectionKind,
        ids: Vec<String>,
    ) -> Result<(), BackofficeError> {
        self.audit.append(&[AuditEntry::bulk(action, collection, ids)])
    }

    /// Append prepared entries in one write
    pub fn log_entries(&self, entries: &[AuditEntry]) -> Result<(), BackofficeError> {
        self.audit.append(entries)
    }
}
