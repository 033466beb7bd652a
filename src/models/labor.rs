//! Labor entry model
//!
//! A labor entry records hours worked at an hourly rate. Its total is always
//! derived from hours × rate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::LaborId;
use super::money::Money;
use super::status::PaymentStatus;

/// Upper bound on the hours of a single entry
pub const MAX_HOURS: f64 = 1_000_000.0;

/// A block of billable work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborItem {
    pub id: LaborId,

    /// Worker or job name; unpaid entries sharing a name are billed as one line
    pub name: String,

    pub date: NaiveDate,

    pub hours: f64,

    /// Hourly rate
    pub rate: Money,

    /// hours × rate
    pub total: Money,

    #[serde(default)]
    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl LaborItem {
    /// Create a new unpaid labor entry
    pub fn new(name: impl Into<String>, date: NaiveDate, hours: f64, rate: Money) -> Self {
        let now = Utc::now();
        Self {
            id: LaborId::new(),
            name: name.into(),
            date,
            hours,
            rate,
            total: rate.times(hours),
            status: PaymentStatus::Unpaid,
            created_at: now,
            updated_at: now,
        }
    }

    /// Change hours and/or rate, keeping the total in step
    pub fn set_hours_and_rate(&mut self, hours: f64, rate: Money) {
        self.hours = hours;
        self.rate = rate;
        self.total = rate.times(hours);
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: PaymentStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Labor name cannot be empty".into());
        }
        if !self.hours.is_finite() || self.hours < 0.0 {
            return Err(format!("Hours must be a non-negative number, got {}", self.hours));
        }
        if self.hours > MAX_HOURS {
            return Err(format!("Hours cannot exceed {}, got {}", MAX_HOURS, self.hours));
        }
        if self.rate.is_negative() {
            return Err("Rate cannot be negative".into());
        }
        if self.rate > Money::MAX_ENTRY || self.total > Money::MAX_ENTRY {
            return Err(format!("Amounts cannot exceed {}", Money::MAX_ENTRY));
        }
        Ok(())
    }
}

impl fmt::Display for LaborItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}h x {} = {}",
            self.date.format("%Y-%m-%d"),
            self.name,
            self.hours,
            self.rate,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_total_is_hours_times_rate() {
        let item = LaborItem::new("Leo x", date(), 6.0, Money::from_cents(3000));
        assert_eq!(item.total, Money::from_cents(18000));
        assert_eq!(item.status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_set_hours_and_rate_recomputes_total() {
        let mut item = LaborItem::new("Leo", date(), 6.0, Money::from_cents(3000));
        item.set_hours_and_rate(2.5, Money::from_cents(4000));
        assert_eq!(item.total, Money::from_cents(10000));
    }

    #[test]
    fn test_validate() {
        assert!(LaborItem::new("Leo", date(), 1.0, Money::zero()).validate().is_ok());
        assert!(LaborItem::new("  ", date(), 1.0, Money::zero()).validate().is_err());
        assert!(LaborItem::new("Leo", date(), -1.0, Money::zero()).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_values() {
        let huge_hours = LaborItem::new("Leo", date(), 1e300, Money::from_cents(100));
        assert!(huge_hours.validate().unwrap_err().contains("Hours cannot exceed"));

        let huge_total = LaborItem::new("Leo", date(), MAX_HOURS, Money::MAX_ENTRY);
        assert!(huge_total.validate().unwrap_err().contains("Amounts cannot exceed"));

        let at_limit = LaborItem::new("Leo", date(), 1.0, Money::MAX_ENTRY);
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_display() {
        let item = LaborItem::new("Leo", date(), 6.0, Money::from_cents(3000));
        assert_eq!(item.to_string(), "2024-01-01 Leo 6h x 30.00 = 180.00");
    }
}
