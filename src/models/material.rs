//! Material purchase model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::comment::Comment;
use super::ids::MaterialId;
use super::money::Money;
use super::status::PaymentStatus;

/// Upper bound on the quantity of a single purchase
pub const MAX_QUANTITY: f64 = 1_000_000.0;

/// A purchased material, billed 1:1 as an invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    pub id: MaterialId,
    pub name: String,
    pub date: NaiveDate,
    pub quantity: f64,
    pub unit_price: Money,

    /// quantity × unit price
    pub total: Money,

    #[serde(default)]
    pub status: PaymentStatus,

    /// Where the material was bought (store page, receipt scan)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaterialItem {
    pub fn new(name: impl Into<String>, date: NaiveDate, quantity: f64, unit_price: Money) -> Self {
        let now = Utc::now();
        Self {
            id: MaterialId::new(),
            name: name.into(),
            date,
            quantity,
            unit_price,
            total: unit_price.times(quantity),
            status: PaymentStatus::Unpaid,
            link_url: None,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_quantity_and_price(&mut self, quantity: f64, unit_price: Money) {
        self.quantity = quantity;
        self.unit_price = unit_price;
        self.total = unit_price.times(quantity);
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Material name cannot be empty".into());
        }
        if !self.quantity.is_finite() || self.quantity < 0.0 {
            return Err(format!(
                "Quantity must be a non-negative number, got {}",
                self.quantity
            ));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(format!(
                "Quantity cannot exceed {}, got {}",
                MAX_QUANTITY, self.quantity
            ));
        }
        if self.unit_price.is_negative() {
            return Err("Unit price cannot be negative".into());
        }
        if self.unit_price > Money::MAX_ENTRY || self.total > Money::MAX_ENTRY {
            return Err(format!("Amounts cannot exceed {}", Money::MAX_ENTRY));
        }
        Ok(())
    }
}

impl fmt::Display for MaterialItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} x {} = {}",
            self.date.format("%Y-%m-%d"),
            self.name,
            self.quantity,
            self.unit_price,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_material() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let m = MaterialItem::new("Cement", date, 4.0, Money::from_cents(25050));
        assert_eq!(m.total, Money::from_cents(100200));
        assert!(m.comments.is_empty());
        assert!(m.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_values() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let huge = MaterialItem::new("Cement", date, 1e300, Money::from_cents(100));
        assert!(huge.validate().unwrap_err().contains("Quantity cannot exceed"));

        let pricey = MaterialItem::new("Cement", date, 2.0, Money::MAX_ENTRY);
        assert!(pricey.validate().unwrap_err().contains("Amounts cannot exceed"));
    }

    #[test]
    fn test_comments_append() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let mut m = MaterialItem::new("Cement", date, 1.0, Money::zero());
        m.add_comment(Comment::new("Ana", "delivered"));
        m.add_comment(Comment::new("Ana", "stored in shed"));
        assert_eq!(m.comments.len(), 2);
        assert_eq!(m.comments[1].text, "stored in shed");
    }
}
