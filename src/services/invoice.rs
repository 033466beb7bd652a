//! Invoice service
//!
//! Owns the invoice lifecycle: creating the single draft, finalizing it into
//! a paid invoice, reopening a paid invoice, and deleting invoices. Every
//! transition keeps the payment status of the underlying labor and
//! materials in step with the invoices that reference them.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::audit::{Action, AuditEntry};
use crate::config::Settings;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{
    ClientInfo, CollectionKind, Invoice, InvoiceItem, InvoiceStatus, LaborId, MaterialId, PaymentStatus,
};
use crate::services::billing::{consolidate_unbilled, draft_view};
use crate::services::confirm::{BulkOutcome, Confirm};
use crate::services::filter::ListFilter;
use crate::storage::Storage;

/// Input for creating the draft invoice
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    pub invoice_number: String,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub client: ClientInfo,
}

/// Changes to an invoice's header details
#[derive(Debug, Clone, Default)]
pub struct InvoiceUpdate {
    pub invoice_number: Option<String>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub vat_info: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Service for invoice management
pub struct InvoiceService<'a> {
    storage: &'a Storage,
}

impl<'a> InvoiceService<'a> {
    /// Create a new invoice service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The current unbilled lines, derived from unpaid labor and materials
    pub fn unbilled_items(&self) -> BackofficeResult<Vec<InvoiceItem>> {
        let labor = self.storage.labor.get_all()?;
        let materials = self.storage.materials.get_all()?;
        Ok(consolidate_unbilled(&labor, &materials))
    }

    /// The stored draft invoice, if there is one
    pub fn get_draft(&self) -> BackofficeResult<Option<Invoice>> {
        Ok(self
            .storage
            .invoices
            .get_all()?
            .into_iter()
            .find(|i| i.is_draft()))
    }

    /// Suggest the next invoice number
    ///
    /// The first invoice is `INV-001`; later ones take the largest trailing
    /// number among existing invoices plus one.
    pub fn suggest_next_number(&self, settings: &Settings) -> BackofficeResult<String> {
        let invoices = self.storage.invoices.get_all()?;
        let next = invoices
            .iter()
            .filter_map(|i| trailing_number(&i.invoice_number))
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        Ok(format!(
            "{}{:0width$}",
            settings.invoice_prefix,
            next,
            width = settings.invoice_number_width
        ))
    }

    /// Create the draft invoice
    pub fn create_draft(&self, input: CreateInvoiceInput) -> BackofficeResult<Invoice> {
        let mut invoice = Invoice::draft(input.invoice_number.trim(), input.date, input.client);
        invoice.due_date = input.due_date;

        invoice.validate().map_err(BackofficeError::Validation)?;

        if self.get_draft()?.is_some() {
            return Err(BackofficeError::DraftExists);
        }

        if self.unbilled_items()?.is_empty() {
            return Err(BackofficeError::Validation(
                "There are no unbilled items to invoice.".into(),
            ));
        }

        // Save
        self.storage.invoices.upsert(invoice.clone())?;
        self.storage.invoices.save()?;

        // Audit log
        self.storage.log_create(
            CollectionKind::Invoices,
            invoice.id.to_string(),
            invoice.invoice_number.clone(),
            &invoice,
        )?;

        Ok(invoice)
    }

    /// Find an invoice by id, id prefix or invoice number, as it is displayed
    pub fn find(&self, identifier: &str) -> BackofficeResult<Invoice> {
        let invoice = self.storage.invoices.find(identifier)?;
        self.view(&invoice)
    }

    /// List invoices as displayed, with the draft following the unbilled list
    pub fn list(&self, filter: &ListFilter) -> BackofficeResult<Vec<Invoice>> {
        let unbilled = self.unbilled_items()?;
        let invoices = self
            .storage
            .invoices
            .get_all()?
            .iter()
            .map(|i| draft_view(i, &unbilled))
            .collect();
        Ok(filter.apply(invoices))
    }

    fn view(&self, invoice: &Invoice) -> BackofficeResult<Invoice> {
        if invoice.is_draft() {
            Ok(draft_view(invoice, &self.unbilled_items()?))
        } else {
            Ok(invoice.clone())
        }
    }

    /// Edit the number, dates or client details of an invoice
    pub fn update(&self, identifier: &str, update: InvoiceUpdate) -> BackofficeResult<Invoice> {
        let mut invoice = self.storage.invoices.find(identifier)?;
        let before = invoice.clone();

        if let Some(number) = update.invoice_number {
            invoice.invoice_number = number.trim().to_string();
        }
        if let Some(date) = update.date {
            invoice.date = date;
        }
        if update.due_date.is_some() {
            invoice.due_date = update.due_date;
        }
        if let Some(name) = update.client_name {
            invoice.client.name = name.trim().to_string();
        }
        if update.address.is_some() {
            invoice.client.address = update.address;
        }
        if update.vat_info.is_some() {
            invoice.client.vat_info = update.vat_info;
        }
        if update.postal_code.is_some() {
            invoice.client.postal_code = update.postal_code;
        }
        if update.phone.is_some() {
            invoice.client.phone = update.phone;
        }
        if update.email.is_some() {
            invoice.client.email = update.email;
        }
        invoice.updated_at = chrono::Utc::now();

        invoice.validate().map_err(BackofficeError::Validation)?;

        self.storage.invoices.upsert(invoice.clone())?;
        self.storage.invoices.save()?;

        self.storage.log_update(
            CollectionKind::Invoices,
            invoice.id.to_string(),
            invoice.invoice_number.clone(),
            &before,
            &invoice,
        )?;

        self.view(&invoice)
    }

    /// Move an invoice to a new status
    ///
    /// Draft to Paid freezes the current unbilled lines onto the invoice and
    /// marks their sources paid. Paid to Draft clears the frozen lines and
    /// marks their sources unpaid again. Setting the current status is a no-op.
    pub fn set_status(&self, identifier: &str, status: InvoiceStatus) -> BackofficeResult<Invoice> {
        let mut invoice = self.storage.invoices.find(identifier)?;
        let before = invoice.clone();

        let (action, affected) = match (invoice.status, status) {
            (InvoiceStatus::Draft, InvoiceStatus::Paid) => {
                let unbilled = self.unbilled_items()?;
                if unbilled.is_empty() {
                    return Err(BackofficeError::EmptyInvoice);
                }
                invoice.finalize(unbilled);

                let affected = self.mark_sources(
                    &invoice.referenced_labor_ids(),
                    &invoice.referenced_material_ids(),
                    PaymentStatus::Paid,
                )?;
                (Action::Bill, affected)
            }
            (InvoiceStatus::Paid, InvoiceStatus::Draft) => {
                let other_draft = self.get_draft()?.is_some_and(|d| d.id != invoice.id);
                if other_draft {
                    return Err(BackofficeError::DraftExists);
                }
                let labor_ids = invoice.referenced_labor_ids();
                let material_ids = invoice.referenced_material_ids();
                invoice.reopen();

                let affected = self.mark_sources(&labor_ids, &material_ids, PaymentStatus::Unpaid)?;
                (Action::Release, affected)
            }
            _ => return self.view(&invoice),
        };

        self.storage.invoices.upsert(invoice.clone())?;
        self.storage.invoices.save()?;

        self.storage.log_entries(&[AuditEntry::invoice_transition(
            action,
            &before,
            Some(&invoice),
            affected,
        )])?;

        self.view(&invoice)
    }

    /// Delete an invoice after confirmation, reverting its lines to unpaid
    ///
    /// Returns `None` when the user declines.
    pub fn delete(&self, identifier: &str, confirm: &dyn Confirm) -> BackofficeResult<Option<Invoice>> {
        let invoice = self.storage.invoices.find(identifier)?;

        let prompt = format!(
            "Delete invoice {}? This will move all its items back to \"Unpaid\".",
            invoice.invoice_number
        );
        if !confirm.confirm(&prompt) {
            return Ok(None);
        }

        let affected = self.mark_sources(
            &invoice.referenced_labor_ids(),
            &invoice.referenced_material_ids(),
            PaymentStatus::Unpaid,
        )?;

        self.storage.invoices.delete(invoice.id)?;
        self.storage.invoices.save()?;

        let entry = if invoice.is_paid() {
            AuditEntry::invoice_transition(Action::Release, &invoice, None, affected)
        } else {
            AuditEntry::deleted(
                CollectionKind::Invoices,
                invoice.id.to_string(),
                invoice.invoice_number.clone(),
                &invoice,
            )
        };
        self.storage.log_entries(&[entry])?;

        Ok(Some(invoice))
    }

    /// Delete every invoice after confirmation, reverting all lines to unpaid
    pub fn delete_all(&self, confirm: &dyn Confirm) -> BackofficeResult<BulkOutcome> {
        let invoices = self.storage.invoices.get_all()?;
        if invoices.is_empty() {
            return Ok(BulkOutcome::NothingToDelete);
        }

        if !confirm.confirm(
            "Delete all invoices? This will move all items in paid invoices back to \"Unpaid\". This action cannot be undone.",
        ) {
            return Ok(BulkOutcome::Cancelled);
        }

        let labor_ids: HashSet<LaborId> = invoices
            .iter()
            .flat_map(|i| i.referenced_labor_ids())
            .collect();
        let material_ids: HashSet<MaterialId> = invoices
            .iter()
            .flat_map(|i| i.referenced_material_ids())
            .collect();
        self.mark_sources(&labor_ids, &material_ids, PaymentStatus::Unpaid)?;

        self.storage.invoices.clear()?;
        self.storage.invoices.save()?;

        self.storage.log_bulk(
            Action::Clear,
            CollectionKind::Invoices,
            invoices.iter().map(|i| i.id.to_string()).collect(),
        )?;

        Ok(BulkOutcome::Deleted(invoices.len()))
    }

    /// Labor entries frozen onto a paid invoice
    pub fn paid_labor_references(&self) -> BackofficeResult<HashSet<LaborId>> {
        Ok(self
            .storage
            .invoices
            .get_all()?
            .iter()
            .filter(|i| i.is_paid())
            .flat_map(|i| i.referenced_labor_ids())
            .collect())
    }

    /// Materials frozen onto a paid invoice
    pub fn paid_material_references(&self) -> BackofficeResult<HashSet<MaterialId>> {
        Ok(self
            .storage
            .invoices
            .get_all()?
            .iter()
            .filter(|i| i.is_paid())
            .flat_map(|i| i.referenced_material_ids())
            .collect())
    }

    /// Set the payment status of the labor and materials behind invoice lines
    ///
    /// Returns the ids whose status actually changed.
    fn mark_sources(
        &self,
        labor_ids: &HashSet<LaborId>,
        material_ids: &HashSet<MaterialId>,
        status: PaymentStatus,
    ) -> BackofficeResult<Vec<String>> {
        let mut changed = Vec::new();

        if !labor_ids.is_empty() {
            self.storage.labor.modify(|item| {
                if !labor_ids.contains(&item.id) || item.status == status {
                    return false;
                }
                item.set_status(status);
                changed.push(item.id.to_string());
                true
            })?;
            self.storage.labor.save()?;
        }

        if !material_ids.is_empty() {
            self.storage.materials.modify(|item| {
                if !material_ids.contains(&item.id) || item.status == status {
                    return false;
                }
                item.set_status(status);
                changed.push(item.id.to_string());
                true
            })?;
            self.storage.materials.save()?;
        }

        Ok(changed)
    }
}

/// Trailing decimal digits of an invoice number, e.g. 12 for "INV-012"
fn trailing_number(invoice_number: &str) -> Option<u64> {
    let trimmed = invoice_number.trim();
    let digits = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| &trimmed[i..])?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BackofficePaths;
    use crate::models::{LaborItem, MaterialItem, Money};
    use crate::services::confirm::{AssumeNo, AssumeYes};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn add_labor(storage: &Storage, name: &str, hours: f64, rate: i64) -> LaborItem {
        let item = LaborItem::new(name, date(1, 1), hours, Money::from_cents(rate));
        storage.labor.upsert(item.clone()).unwrap();
        item
    }

    fn add_material(storage: &Storage, name: &str) -> MaterialItem {
        let item = MaterialItem::new(name, date(1, 2), 2.0, Money::from_cents(250));
        storage.materials.upsert(item.clone()).unwrap();
        item
    }

    fn input(number: &str) -> CreateInvoiceInput {
        CreateInvoiceInput {
            invoice_number: number.into(),
            date: date(2, 1),
            due_date: None,
            client: ClientInfo::named("Acme"),
        }
    }

    #[test]
    fn test_create_draft_requires_fields() {
        let (_temp_dir, storage) = create_test_storage();
        add_labor(&storage, "Leo", 6.0, 3000);
        let service = InvoiceService::new(&storage);

        let err = service.create_draft(input("  ")).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Please enter an invoice number.");

        let mut no_client = input("INV-001");
        no_client.client = ClientInfo::named("");
        let err = service.create_draft(no_client).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Please enter the client's name.");
    }

    #[test]
    fn test_create_draft_requires_unbilled_items() {
        let (_temp_dir, storage) = create_test_storage();
        let service = InvoiceService::new(&storage);

        assert!(service.create_draft(input("INV-001")).unwrap_err().is_validation());
        assert_eq!(storage.invoices.count().unwrap(), 0);
    }

    #[test]
    fn test_second_draft_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        add_labor(&storage, "Leo", 6.0, 3000);
        let service = InvoiceService::new(&storage);

        service.create_draft(input("INV-001")).unwrap();
        let err = service.create_draft(input("INV-002")).unwrap_err();
        assert!(matches!(err, BackofficeError::DraftExists));
        assert_eq!(storage.invoices.count().unwrap(), 1);
    }

    #[test]
    fn test_draft_shows_live_unbilled_items() {
        let (_temp_dir, storage) = create_test_storage();
        add_labor(&storage, "Leo", 6.0, 3000);
        let service = InvoiceService::new(&storage);
        let draft = service.create_draft(input("INV-001")).unwrap();

        let stored = storage.invoices.get(draft.id).unwrap().unwrap();
        assert!(stored.items.is_empty());
        assert!(stored.total.is_zero());

        add_material(&storage, "Cement");
        let view = service.find("INV-001").unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total, Money::from_cents(18500));
    }

    #[test]
    fn test_finalize_empty_invoice_fails_without_changes() {
        let (_temp_dir, storage) = create_test_storage();
        let leo = add_labor(&storage, "Leo", 6.0, 3000);
        let service = InvoiceService::new(&storage);
        let draft = service.create_draft(input("INV-001")).unwrap();

        // Everything gets paid elsewhere before the draft is finalized
        let mut paid = leo.clone();
        paid.set_status(PaymentStatus::Paid);
        storage.labor.upsert(paid).unwrap();

        let err = service
            .set_status(&draft.id.to_string(), InvoiceStatus::Paid)
            .unwrap_err();
        assert!(matches!(err, BackofficeError::EmptyInvoice));

        let stored = storage.invoices.get(draft.id).unwrap().unwrap();
        assert!(stored.is_draft());
        assert!(stored.items.is_empty());
    }

    #[test]
    fn test_finalize_then_reopen_round_trip() {
        let (_temp_dir, storage) = create_test_storage();
        let leo = add_labor(&storage, "Leo", 6.0, 3000);
        let leo2 = add_labor(&storage, "leo", 2.0, 3000);
        let cement = add_material(&storage, "Cement");
        let service = InvoiceService::new(&storage);
        let draft = service.create_draft(input("INV-001")).unwrap();

        let paid = service.set_status("INV-001", InvoiceStatus::Paid).unwrap();
        assert!(paid.is_paid());
        assert_eq!(paid.items.len(), 2);
        assert_eq!(paid.total, Money::from_cents(24000 + 500));
        assert!(paid.items.iter().all(|i| i.status.is_paid()));

        for id in [leo.id, leo2.id] {
            assert!(storage.labor.get(id).unwrap().unwrap().status.is_paid());
        }
        assert!(storage.materials.get(cement.id).unwrap().unwrap().status.is_paid());
        assert!(service.unbilled_items().unwrap().is_empty());

        let reopened = service.set_status("INV-001", InvoiceStatus::Draft).unwrap();
        assert!(reopened.is_draft());
        assert_eq!(reopened.items.len(), 2);

        let stored = storage.invoices.get(draft.id).unwrap().unwrap();
        assert!(stored.items.is_empty());
        assert!(stored.total.is_zero());
        for id in [leo.id, leo2.id] {
            assert_eq!(storage.labor.get(id).unwrap().unwrap().status, PaymentStatus::Unpaid);
        }
        assert_eq!(
            storage.materials.get(cement.id).unwrap().unwrap().status,
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_reopen_rejected_while_another_draft_exists() {
        let (_temp_dir, storage) = create_test_storage();
        add_labor(&storage, "Leo", 6.0, 3000);
        let service = InvoiceService::new(&storage);
        service.create_draft(input("INV-001")).unwrap();
        service.set_status("INV-001", InvoiceStatus::Paid).unwrap();

        add_labor(&storage, "Mia", 1.0, 1000);
        service.create_draft(input("INV-002")).unwrap();

        let err = service.set_status("INV-001", InvoiceStatus::Draft).unwrap_err();
        assert!(matches!(err, BackofficeError::DraftExists));
        assert!(service.find("INV-001").unwrap().is_paid());
    }

    #[test]
    fn test_same_status_is_noop() {
        let (_temp_dir, storage) = create_test_storage();
        add_labor(&storage, "Leo", 6.0, 3000);
        let service = InvoiceService::new(&storage);
        service.create_draft(input("INV-001")).unwrap();

        let view = service.set_status("INV-001", InvoiceStatus::Draft).unwrap();
        assert!(view.is_draft());
        assert_eq!(storage.audit().read_recent(10).unwrap().len(), 1);
    }

    #[test]
    fn test_transitions_log_one_entry_per_invoice() {
        let (_temp_dir, storage) = create_test_storage();
        let leo = add_labor(&storage, "Leo", 6.0, 3000);
        let mia = add_labor(&storage, "Mia", 1.0, 1000);
        let cement = add_material(&storage, "Cement");
        let service = InvoiceService::new(&storage);
        service.create_draft(input("INV-001")).unwrap();

        service.set_status("INV-001", InvoiceStatus::Paid).unwrap();
        service.set_status("INV-001", InvoiceStatus::Draft).unwrap();

        let entries = storage.audit().read_recent(10).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].action, Action::Create);

        let bill = &entries[1];
        assert_eq!(bill.action, Action::Bill);
        assert_eq!(bill.label.as_deref(), Some("INV-001"));
        assert!(bill.changes.contains(&"status: Draft -> Paid".to_string()));
        let mut affected = bill.affected.clone();
        affected.sort();
        let mut expected = vec![leo.id.to_string(), mia.id.to_string(), cement.id.to_string()];
        expected.sort();
        assert_eq!(affected, expected);

        assert_eq!(entries[2].action, Action::Release);
        assert_eq!(entries[2].affected.len(), 3);
    }

    #[test]
    fn test_delete_reverts_items() {
        let (_temp_dir, storage) = create_test_storage();
        let leo = add_labor(&storage, "Leo", 6.0, 3000);
        let service = InvoiceService::new(&storage);
        service.create_draft(input("INV-001")).unwrap();
        service.set_status("INV-001", InvoiceStatus::Paid).unwrap();

        assert!(service.delete("INV-001", &AssumeNo).unwrap().is_none());
        assert_eq!(storage.invoices.count().unwrap(), 1);

        let deleted = service.delete("INV-001", &AssumeYes).unwrap().unwrap();
        assert_eq!(deleted.invoice_number, "INV-001");
        assert_eq!(storage.invoices.count().unwrap(), 0);
        assert_eq!(
            storage.labor.get(leo.id).unwrap().unwrap().status,
            PaymentStatus::Unpaid
        );
    }

    #[test]
    fn test_delete_all() {
        let (_temp_dir, storage) = create_test_storage();
        let service = InvoiceService::new(&storage);
        assert_eq!(service.delete_all(&AssumeYes).unwrap(), BulkOutcome::NothingToDelete);

        let leo = add_labor(&storage, "Leo", 6.0, 3000);
        service.create_draft(input("INV-001")).unwrap();
        service.set_status("INV-001", InvoiceStatus::Paid).unwrap();

        assert_eq!(service.delete_all(&AssumeNo).unwrap(), BulkOutcome::Cancelled);
        assert_eq!(service.delete_all(&AssumeYes).unwrap(), BulkOutcome::Deleted(1));
        assert_eq!(storage.invoices.count().unwrap(), 0);
        assert!(!storage.labor.get(leo.id).unwrap().unwrap().status.is_paid());
    }

    #[test]
    fn test_suggest_next_number() {
        let (_temp_dir, storage) = create_test_storage();
        let service = InvoiceService::new(&storage);
        let settings = Settings::default();

        assert_eq!(service.suggest_next_number(&settings).unwrap(), "INV-001");

        for number in ["INV-007", "INV-012", "misc"] {
            storage
                .invoices
                .upsert(Invoice::draft(number, date(1, 1), ClientInfo::named("Acme")))
                .unwrap();
        }
        assert_eq!(service.suggest_next_number(&settings).unwrap(), "INV-013");

        storage
            .invoices
            .upsert(Invoice::draft(
                "INV-18446744073709551615",
                date(1, 1),
                ClientInfo::named("Acme"),
            ))
            .unwrap();
        assert_eq!(
            service.suggest_next_number(&settings).unwrap(),
            "INV-18446744073709551615"
        );
    }

    #[test]
    fn test_trailing_number() {
        assert_eq!(trailing_number("INV-042"), Some(42));
        assert_eq!(trailing_number("2024-15"), Some(15));
        assert_eq!(trailing_number("draft"), None);
    }

    #[test]
    fn test_paid_references() {
        let (_temp_dir, storage) = create_test_storage();
        let leo = add_labor(&storage, "Leo", 6.0, 3000);
        let cement = add_material(&storage, "Cement");
        let service = InvoiceService::new(&storage);
        service.create_draft(input("INV-001")).unwrap();
        assert!(service.paid_labor_references().unwrap().is_empty());

        service.set_status("INV-001", InvoiceStatus::Paid).unwrap();
        assert!(service.paid_labor_references().unwrap().contains(&leo.id));
        assert!(service.paid_material_references().unwrap().contains(&cement.id));
    }
}
