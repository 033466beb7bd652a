//! Labor service
//!
//! Business logic for labor entries: creation and editing with the total
//! kept at hours × rate, status changes, and deletes that refuse to touch
//! entries frozen onto a paid invoice.

use chrono::NaiveDate;

use crate::audit::Action;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{CollectionKind, LaborItem, Money, PaymentStatus};
use crate::services::confirm::{BulkOutcome, Confirm};
use crate::services::filter::ListFilter;
use crate::services::invoice::InvoiceService;
use crate::storage::Storage;

/// Input for creating a labor entry
#[derive(Debug, Clone)]
pub struct CreateLaborInput {
    pub name: String,
    pub date: NaiveDate,
    pub hours: f64,
    pub rate: Money,
    pub status: Option<PaymentStatus>,
}

/// Changes to a labor entry
#[derive(Debug, Clone, Default)]
pub struct LaborUpdate {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub hours: Option<f64>,
    pub rate: Option<Money>,
}

/// Service for labor management
pub struct LaborService<'a> {
    storage: &'a Storage,
}

impl<'a> LaborService<'a> {
    /// Create a new labor service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new labor entry
    pub fn create(&self, input: CreateLaborInput) -> BackofficeResult<LaborItem> {
        let mut item = LaborItem::new(input.name.trim(), input.date, input.hours, input.rate);
        if let Some(status) = input.status {
            item.status = status;
        }

        item.validate().map_err(BackofficeError::Validation)?;

        self.storage.labor.upsert(item.clone())?;
        self.storage.labor.save()?;

        self.storage.log_create(
            CollectionKind::Labor,
            item.id.to_string(),
            item.name.clone(),
            &item,
        )?;

        Ok(item)
    }

    /// Find a labor entry by id or id prefix
    pub fn find(&self, identifier: &str) -> BackofficeResult<LaborItem> {
        self.storage.labor.find(identifier)
    }

    /// List labor entries through a filter
    pub fn list(&self, filter: &ListFilter) -> BackofficeResult<Vec<LaborItem>> {
        Ok(filter.apply(self.storage.labor.get_all()?))
    }

    /// Edit a labor entry, recomputing its total
    pub fn update(&self, identifier: &str, update: LaborUpdate) -> BackofficeResult<LaborItem> {
        let mut item = self.storage.labor.find(identifier)?;
        let before = item.clone();

        if let Some(name) = update.name {
            item.name = name.trim().to_string();
        }
        if let Some(date) = update.date {
            item.date = date;
        }
        let hours = update.hours.unwrap_or(item.hours);
        let rate = update.rate.unwrap_or(item.rate);
        item.set_hours_and_rate(hours, rate);

        item.validate().map_err(BackofficeError::Validation)?;

        self.storage.labor.upsert(item.clone())?;
        self.storage.labor.save()?;

        self.storage.log_update(
            CollectionKind::Labor,
            item.id.to_string(),
            item.name.clone(),
            &before,
            &item,
        )?;

        Ok(item)
    }

    /// Set the payment status of a labor entry
    pub fn set_status(&self, identifier: &str, status: PaymentStatus) -> BackofficeResult<LaborItem> {
        let mut item = self.storage.labor.find(identifier)?;
        let before = item.clone();
        item.set_status(status);

        self.storage.labor.upsert(item.clone())?;
        self.storage.labor.save()?;

        self.storage.log_update(
            CollectionKind::Labor,
            item.id.to_string(),
            item.name.clone(),
            &before,
            &item,
        )?;

        Ok(item)
    }

    /// Delete a labor entry after confirmation
    ///
    /// Returns `None` when the user declines.
    pub fn delete(&self, identifier: &str, confirm: &dyn Confirm) -> BackofficeResult<Option<LaborItem>> {
        let item = self.storage.labor.find(identifier)?;

        let invoices = InvoiceService::new(self.storage);
        if invoices.paid_labor_references()?.contains(&item.id) {
            return Err(BackofficeError::ReferencedByPaidInvoice {
                entity_type: "Labor entry",
                identifier: item.id.to_string(),
            });
        }

        if !confirm.confirm(&format!("Delete labor entry '{}' ({})?", item.name, item.date)) {
            return Ok(None);
        }

        self.storage.labor.delete(item.id)?;
        self.storage.labor.save()?;

        self.storage.log_delete(
            CollectionKind::Labor,
            item.id.to_string(),
            item.name.clone(),
            &item,
        )?;

        Ok(Some(item))
    }

    /// Delete every labor entry after confirmation
    ///
    /// Refused while any entry is part of a paid invoice.
    pub fn delete_all(&self, confirm: &dyn Confirm) -> BackofficeResult<BulkOutcome> {
        let items = self.storage.labor.get_all()?;
        if items.is_empty() {
            return Ok(BulkOutcome::NothingToDelete);
        }

        let referenced = InvoiceService::new(self.storage).paid_labor_references()?;
        if items.iter().any(|l| referenced.contains(&l.id)) {
            return Err(BackofficeError::ReferencedByPaidInvoice {
                entity_type: "all",
                identifier: "labor entries".into(),
            });
        }

        if !confirm.confirm("Delete all labor entries? This action cannot be undone.") {
            return Ok(BulkOutcome::Cancelled);
        }

        self.storage.labor.clear()?;
        self.storage.labor.save()?;

        self.storage.log_bulk(
            Action::Clear,
            CollectionKind::Labor,
            items.iter().map(|r| r.id.to_string()).collect(),
        )?;

        Ok(BulkOutcome::Deleted(items.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BackofficePaths;
    use crate::models::{ClientInfo, InvoiceStatus};
    use crate::services::confirm::{AssumeNo, AssumeYes};
    use crate::services::invoice::CreateInvoiceInput;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(name: &str) -> CreateLaborInput {
        CreateLaborInput {
            name: name.into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            hours: 6.0,
            rate: Money::from_cents(3000),
            status: None,
        }
    }

    fn bill_everything(storage: &Storage) {
        let invoices = InvoiceService::new(storage);
        invoices
            .create_draft(CreateInvoiceInput {
                invoice_number: "INV-001".into(),
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                due_date: None,
                client: ClientInfo::named("Acme"),
            })
            .unwrap();
        invoices.set_status("INV-001", InvoiceStatus::Paid).unwrap();
    }

    #[test]
    fn test_create_labor() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LaborService::new(&storage);

        let item = service.create(input("  Leo  ")).unwrap();
        assert_eq!(item.name, "Leo");
        assert_eq!(item.total, Money::from_cents(18000));
        assert_eq!(storage.labor.count().unwrap(), 1);
        assert_eq!(storage.audit().read_recent(10).unwrap().len(), 1);
    }

    #[test]
    fn test_create_rejects_blank_name_and_negative_hours() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LaborService::new(&storage);

        assert!(service.create(input(" ")).unwrap_err().is_validation());

        let mut negative = input("Leo");
        negative.hours = -1.0;
        assert!(service.create(negative).unwrap_err().is_validation());
        assert_eq!(storage.labor.count().unwrap(), 0);
    }

    #[test]
    fn test_update_recomputes_total() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LaborService::new(&storage);
        let item = service.create(input("Leo")).unwrap();

        let updated = service
            .update(
                &item.id.to_string(),
                LaborUpdate {
                    hours: Some(2.5),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.total, Money::from_cents(7500));
        assert_eq!(updated.rate, Money::from_cents(3000));
    }

    #[test]
    fn test_set_status_is_unconditional() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LaborService::new(&storage);
        let item = service.create(input("Leo")).unwrap();

        let paid = service.set_status(&item.id.to_string(), PaymentStatus::Paid).unwrap();
        assert!(paid.status.is_paid());
        let unpaid = service.set_status(&item.id.to_string(), PaymentStatus::Unpaid).unwrap();
        assert!(!unpaid.status.is_paid());
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LaborService::new(&storage);
        let item = service.create(input("Leo")).unwrap();

        assert!(service.delete(&item.id.to_string(), &AssumeNo).unwrap().is_none());
        assert_eq!(storage.labor.count().unwrap(), 1);

        assert!(service.delete(&item.id.to_string(), &AssumeYes).unwrap().is_some());
        assert_eq!(storage.labor.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_blocked_by_paid_invoice() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LaborService::new(&storage);
        let item = service.create(input("Leo")).unwrap();
        bill_everything(&storage);

        let err = service.delete(&item.id.to_string(), &AssumeYes).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(storage.labor.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_all_blocked_until_invoice_reopened() {
        let (_temp_dir, storage) = create_test_storage();
        let service = LaborService::new(&storage);
        assert_eq!(service.delete_all(&AssumeYes).unwrap(), BulkOutcome::NothingToDelete);

        service.create(input("Leo")).unwrap();
        bill_everything(&storage);

        assert!(service.delete_all(&AssumeYes).unwrap_err().is_invariant_violation());

        InvoiceService::new(&storage)
            .set_status("INV-001", InvoiceStatus::Draft)
            .unwrap();
        assert_eq!(service.delete_all(&AssumeNo).unwrap(), BulkOutcome::Cancelled);
        assert_eq!(service.delete_all(&AssumeYes).unwrap(), BulkOutcome::Deleted(1));
        assert_eq!(storage.labor.count().unwrap(), 0);
    }
}
