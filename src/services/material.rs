//! Material service
//!
//! Business logic for material purchases, including their comment threads.

use chrono::NaiveDate;

use crate::audit::Action;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{CollectionKind, Comment, MaterialItem, Money, PaymentStatus};
use crate::services::confirm::{BulkOutcome, Confirm};
use crate::services::filter::ListFilter;
use crate::services::invoice::InvoiceService;
use crate::storage::Storage;

/// Input for creating a material purchase
#[derive(Debug, Clone)]
pub struct CreateMaterialInput {
    pub name: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub unit_price: Money,
    pub status: Option<PaymentStatus>,
    pub link_url: Option<String>,
}

/// Changes to a material purchase
#[derive(Debug, Clone, Default)]
pub struct MaterialUpdate {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub quantity: Option<f64>,
    pub unit_price: Option<Money>,
    /// `Some("")` clears the link
    pub link_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Service for material management
pub struct MaterialService<'a> {
    storage: &'a Storage,
}

impl<'a> MaterialService<'a> {
    /// Create a new material service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new material purchase
    pub fn create(&self, input: CreateMaterialInput) -> BackofficeResult<MaterialItem> {
        let mut item =
            MaterialItem::new(input.name.trim(), input.date, input.quantity, input.unit_price);
        if let Some(status) = input.status {
            item.status = status;
        }
        item.link_url = non_empty(input.link_url);

        item.validate().map_err(BackofficeError::Validation)?;

        self.storage.materials.upsert(item.clone())?;
        self.storage.materials.save()?;

        self.storage.log_create(
            CollectionKind::Materials,
            item.id.to_string(),
            item.name.clone(),
            &item,
        )?;

        Ok(item)
    }

    /// Find a material by id or id prefix
    pub fn find(&self, identifier: &str) -> BackofficeResult<MaterialItem> {
        self.storage.materials.find(identifier)
    }

    /// List materials through a filter
    pub fn list(&self, filter: &ListFilter) -> BackofficeResult<Vec<MaterialItem>> {
        Ok(filter.apply(self.storage.materials.get_all()?))
    }

    /// Edit a material purchase, recomputing its total
    pub fn update(&self, identifier: &str, update: MaterialUpdate) -> BackofficeResult<MaterialItem> {
        let mut item = self.storage.materials.find(identifier)?;
        let before = item.clone();

        if let Some(name) = update.name {
            item.name = name.trim().to_string();
        }
        if let Some(date) = update.date {
            item.date = date;
        }
        if update.link_url.is_some() {
            item.link_url = non_empty(update.link_url);
        }
        let quantity = update.quantity.unwrap_or(item.quantity);
        let unit_price = update.unit_price.unwrap_or(item.unit_price);
        item.set_quantity_and_price(quantity, unit_price);

        item.validate().map_err(BackofficeError::Validation)?;

        self.storage.materials.upsert(item.clone())?;
        self.storage.materials.save()?;

        self.storage.log_update(
            CollectionKind::Materials,
            item.id.to_string(),
            item.name.clone(),
            &before,
            &item,
        )?;

        Ok(item)
    }

    /// Set the payment status of a material
    pub fn set_status(&self, identifier: &str, status: PaymentStatus) -> BackofficeResult<MaterialItem> {
        let mut item = self.storage.materials.find(identifier)?;
        let before = item.clone();
        item.set_status(status);

        self.storage.materials.upsert(item.clone())?;
        self.storage.materials.save()?;

        self.storage.log_update(
            CollectionKind::Materials,
            item.id.to_string(),
            item.name.clone(),
            &before,
            &item,
        )?;

        Ok(item)
    }

    /// Append a comment to a material
    pub fn add_comment(
        &self,
        identifier: &str,
        author: &str,
        text: &str,
        link_url: Option<String>,
    ) -> BackofficeResult<MaterialItem> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BackofficeError::Validation("Comment cannot be empty".into()));
        }
        let author = match author.trim() {
            "" => "User",
            a => a,
        };

        let mut item = self.storage.materials.find(identifier)?;
        let before = item.clone();
        item.add_comment(Comment::new(author, text).with_link(non_empty(link_url)));

        self.storage.materials.upsert(item.clone())?;
        self.storage.materials.save()?;

        self.storage.log_update(
            CollectionKind::Materials,
            item.id.to_string(),
            item.name.clone(),
            &before,
            &item,
        )?;

        Ok(item)
    }

    /// Delete a material after confirmation
    ///
    /// Returns `None` when the user declines.
    pub fn delete(&self, identifier: &str, confirm: &dyn Confirm) -> BackofficeResult<Option<MaterialItem>> {
        let item = self.storage.materials.find(identifier)?;

        let invoices = InvoiceService::new(self.storage);
        if invoices.paid_material_references()?.contains(&item.id) {
            return Err(BackofficeError::ReferencedByPaidInvoice {
                entity_type: "Material",
                identifier: item.id.to_string(),
            });
        }

        if !confirm.confirm(&format!("Delete material '{}' ({})?", item.name, item.date)) {
            return Ok(None);
        }

        self.storage.materials.delete(item.id)?;
        self.storage.materials.save()?;

        self.storage.log_delete(
            CollectionKind::Materials,
            item.id.to_string(),
            item.name.clone(),
            &item,
        )?;

        Ok(Some(item))
    }

    /// Delete every material after confirmation
    ///
    /// Refused while any material is part of a paid invoice.
    pub fn delete_all(&self, confirm: &dyn Confirm) -> BackofficeResult<BulkOutcome> {
        let items = self.storage.materials.get_all()?;
        if items.is_empty() {
            return Ok(BulkOutcome::NothingToDelete);
        }

        let referenced = InvoiceService::new(self.storage).paid_material_references()?;
        if items.iter().any(|m| referenced.contains(&m.id)) {
            return Err(BackofficeError::ReferencedByPaidInvoice {
                entity_type: "all",
                identifier: "materials".into(),
            });
        }

        if !confirm.confirm("Delete all materials? This action cannot be undone.") {
            return Ok(BulkOutcome::Cancelled);
        }

        self.storage.materials.clear()?;
        self.storage.materials.save()?;

        self.storage.log_bulk(
            Action::Clear,
            CollectionKind::Materials,
            items.iter().map(|r| r.id.to_string()).collect(),
        )?;

        Ok(BulkOutcome::Deleted(items.len()))
    }
}
