//! Full data reset

use crate::audit::{Action, AuditEntry};
use crate::error::BackofficeResult;
use crate::models::CollectionKind;
use crate::services::confirm::Confirm;
use crate::storage::Storage;

/// Empty all four collections after confirmation
///
/// Returns false when the user declines.
pub fn reset_all(storage: &Storage, confirm: &dyn Confirm) -> BackofficeResult<bool> {
    if !confirm.confirm("Reset ALL data? This action cannot be undone.") {
        return Ok(false);
    }

    let cleared: [(CollectionKind, Vec<String>); 4] = [
        (CollectionKind::Labor, storage.labor.get_all()?.iter().map(|r| r.id.to_string()).collect()),
        (CollectionKind::Materials, storage.materials.get_all()?.iter().map(|r| r.id.to_string()).collect()),
        (CollectionKind::Tasks, storage.tasks.get_all()?.iter().map(|r| r.id.to_string()).collect()),
        (CollectionKind::Invoices, storage.invoices.get_all()?.iter().map(|r| r.id.to_string()).collect()),
    ];

    storage.labor.clear()?;
    storage.materials.clear()?;
    storage.tasks.clear()?;
    storage.invoices.clear()?;
    storage.save_all()?;

    let entries: Vec<AuditEntry> = cleared
        .into_iter()
        .filter(|(_, ids)| !ids.is_empty())
        .map(|(kind, ids)| AuditEntry::bulk(Action::Clear, kind, ids))
        .collect();
    storage.log_entries(&entries)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BackofficePaths;
    use crate::models::{LaborItem, Money, Task};
    use crate::services::confirm::{AssumeNo, AssumeYes};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_reset_all() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        storage
            .labor
            .upsert(LaborItem::new("Leo", date, 1.0, Money::from_cents(100)))
            .unwrap();
        storage.tasks.upsert(Task::new("Paint", date)).unwrap();

        assert!(!reset_all(&storage, &AssumeNo).unwrap());
        assert_eq!(storage.labor.count().unwrap(), 1);

        assert!(reset_all(&storage, &AssumeYes).unwrap());
        assert_eq!(storage.labor.count().unwrap(), 0);
        assert_eq!(storage.tasks.count().unwrap(), 0);
        let entries = storage.audit().read_recent(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.action == Action::Clear));
        assert_eq!(entries[0].collection, CollectionKind::Labor);
        assert_eq!(entries[1].collection, CollectionKind::Tasks);
    }
}
