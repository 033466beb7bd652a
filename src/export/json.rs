//! JSON snapshot export
//!
//! Exports all four collections to a single JSON document with schema
//! versioning.

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{Invoice, LaborItem, MaterialItem, Task};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Current snapshot schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full snapshot of the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub labor: Vec<LaborItem>,
    pub materials: Vec<MaterialItem>,
    pub tasks: Vec<Task>,
    pub invoices: Vec<Invoice>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Snapshot metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub labor_count: usize,
    pub material_count: usize,
    pub task_count: usize,
    pub invoice_count: usize,

    /// Earliest labor or material date
    pub earliest_entry: Option<String>,

    /// Latest labor or material date
    pub latest_entry: Option<String>,
}

impl FullExport {
    /// Create a snapshot from storage
    pub fn from_storage(storage: &Storage) -> BackofficeResult<Self> {
        let labor = storage.labor.get_all()?;
        let materials = storage.materials.get_all()?;
        let tasks = storage.tasks.get_all()?;
        let invoices = storage.invoices.get_all()?;

        let dates: Vec<_> = labor
            .iter()
            .map(|l| l.date)
            .chain(materials.iter().map(|m| m.date))
            .collect();

        let metadata = ExportMetadata {
            labor_count: labor.len(),
            material_count: materials.len(),
            task_count: tasks.len(),
            invoice_count: invoices.len(),
            earliest_entry: dates.iter().min().map(|d| d.to_string()),
            latest_entry: dates.iter().max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            labor,
            materials,
            tasks,
            invoices,
            metadata,
        })
    }
}

/// Export the full ledger to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> BackofficeResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BackofficeError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BackofficePaths;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_full_export() {
        let (_temp_dir, storage) = create_test_storage();
        let early = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        storage
            .labor
            .upsert(LaborItem::new("Leo", late, 6.0, Money::from_cents(3000)))
            .unwrap();
        storage
            .materials
            .upsert(MaterialItem::new("Cement", early, 1.0, Money::from_cents(500)))
            .unwrap();
        storage.tasks.upsert(Task::new("Paint", early)).unwrap();

        let export = FullExport::from_storage(&storage).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.labor_count, 1);
        assert_eq!(export.metadata.material_count, 1);
        assert_eq!(export.metadata.task_count, 1);
        assert_eq!(export.metadata.invoice_count, 0);
        assert_eq!(export.metadata.earliest_entry.as_deref(), Some("2024-01-15"));
        assert_eq!(export.metadata.latest_entry.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_json_output_parses_back() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .labor
            .upsert(LaborItem::new(
                "Leo",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                6.0,
                Money::from_cents(3000),
            ))
            .unwrap();

        let mut json_output = Vec::new();
        export_full_json(&storage, &mut json_output, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&json_output).unwrap();
        assert_eq!(parsed.labor.len(), 1);
        assert_eq!(parsed.labor[0].name, "Leo");
        assert_eq!(parsed.labor[0].total, Money::from_cents(18000));
    }
}
