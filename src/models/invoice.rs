//! Invoice model
//!
//! A Draft invoice stores no lines of its own: while it is a draft its lines
//! are the live unbilled list. Finalizing freezes that list onto the invoice.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ids::{InvoiceId, LaborId, MaterialId};
use super::money::Money;
use super::status::{InvoiceStatus, PaymentStatus};

/// Which collection an invoice line was folded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Labor,
    Material,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Labor => write!(f, "labor"),
            Self::Material => write!(f, "material"),
        }
    }
}

/// One invoice line, derived from unpaid labor or materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    /// Ids of the labor entries or the material this line was built from
    pub original_ids: Vec<Uuid>,
    pub kind: LineKind,
}

impl InvoiceItem {
    pub fn labor_ids(&self) -> Vec<LaborId> {
        match self.kind {
            LineKind::Labor => self.original_ids.iter().copied().map(LaborId::from).collect(),
            LineKind::Material => Vec::new(),
        }
    }

    pub fn material_ids(&self) -> Vec<MaterialId> {
        match self.kind {
            LineKind::Material => self
                .original_ids
                .iter()
                .copied()
                .map(MaterialId::from)
                .collect(),
            LineKind::Labor => Vec::new(),
        }
    }
}

/// Billing details of the invoiced client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vat_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ClientInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,

    /// User-assigned number; uniqueness is not enforced
    pub invoice_number: String,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,

    pub client: ClientInfo,

    #[serde(default)]
    pub items: Vec<InvoiceItem>,

    #[serde(default)]
    pub total: Money,

    #[serde(default)]
    pub status: InvoiceStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Create an empty draft
    pub fn draft(invoice_number: impl Into<String>, date: NaiveDate, client: ClientInfo) -> Self {
        let now = Utc::now();
        Self {
            id: InvoiceId::new(),
            invoice_number: invoice_number.into(),
            date,
            due_date: None,
            client,
            items: Vec::new(),
            total: Money::zero(),
            status: InvoiceStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == InvoiceStatus::Draft
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Freeze `items` onto the invoice and mark it paid
    pub fn finalize(&mut self, items: Vec<InvoiceItem>) {
        self.total = items.iter().map(|i| i.amount).sum();
        self.items = items
            .into_iter()
            .map(|mut item| {
                item.status = PaymentStatus::Paid;
                item
            })
            .collect();
        self.status = InvoiceStatus::Paid;
        self.updated_at = Utc::now();
    }

    /// Drop the frozen lines and go back to being a draft
    pub fn reopen(&mut self) {
        self.items.clear();
        self.total = Money::zero();
        self.status = InvoiceStatus::Draft;
        self.updated_at = Utc::now();
    }

    pub fn referenced_labor_ids(&self) -> HashSet<LaborId> {
        self.items.iter().flat_map(|i| i.labor_ids()).collect()
    }

    pub fn referenced_material_ids(&self) -> HashSet<MaterialId> {
        self.items.iter().flat_map(|i| i.material_ids()).collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.invoice_number.trim().is_empty() {
            return Err("Please enter an invoice number.".into());
        }
        if self.client.name.trim().is_empty() {
            return Err("Please enter the client's name.".into());
        }
        Ok(())
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}] {}",
            self.invoice_number,
            self.date.format("%Y-%m-%d"),
            self.client.name,
            self.status,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kind: LineKind, amount: i64, ids: Vec<Uuid>) -> InvoiceItem {
        InvoiceItem {
            id: "line".into(),
            title: "line".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: Money::from_cents(amount),
            status: PaymentStatus::Unpaid,
            link_url: None,
            original_ids: ids,
            kind,
        }
    }

    #[test]
    fn test_finalize_and_reopen() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut invoice = Invoice::draft("INV-001", date, ClientInfo::named("Acme"));
        let labor = LaborId::new();
        let material = MaterialId::new();

        invoice.finalize(vec![
            line(LineKind::Labor, 18000, vec![*labor.as_uuid()]),
            line(LineKind::Material, 500, vec![*material.as_uuid()]),
        ]);

        assert!(invoice.is_paid());
        assert_eq!(invoice.total, Money::from_cents(18500));
        assert!(invoice.items.iter().all(|i| i.status.is_paid()));
        assert!(invoice.referenced_labor_ids().contains(&labor));
        assert!(invoice.referenced_material_ids().contains(&material));
        assert!(!invoice.referenced_labor_ids().contains(&LaborId::from(*material.as_uuid())));

        invoice.reopen();
        assert!(invoice.is_draft());
        assert!(invoice.items.is_empty());
        assert!(invoice.total.is_zero());
    }

    #[test]
    fn test_validate() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(Invoice::draft("INV-001", date, ClientInfo::named("Acme")).validate().is_ok());
        assert!(Invoice::draft(" ", date, ClientInfo::named("Acme")).validate().is_err());
        assert!(Invoice::draft("INV-001", date, ClientInfo::named("")).validate().is_err());
    }
}
