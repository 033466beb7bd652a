//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that consolidated invoice
//! totals add up exactly. Rates and unit prices are Money; hours and
//! quantities are plain `f64` and are multiplied in with [`Money::times`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Largest amount a single rate, price or line total may hold (10 billion)
    pub const MAX_ENTRY: Money = Money(1_000_000_000_000);

    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use backoffice::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiply by a fractional factor (hours, quantity), rounding to the cent
    pub fn times(&self, factor: f64) -> Self {
        Self((self.0 as f64 * factor).round() as i64)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "₱10.50", "10", ".5",
    /// "1e2". Digits past the cent are rounded half away from zero. Amounts
    /// that do not fit in an i64 of cents are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());

        let (negative, rest) = match s.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, s),
        };
        let rest = rest.trim_start_matches(|c: char| c == '$' || c == '₱' || c == '€');

        let cents = match rest.split_once('.') {
            Some((whole, fraction)) => decimal_cents(whole, fraction),
            None if is_digits(rest) => rest.parse::<i64>().ok().and_then(|d| d.checked_mul(100)),
            None => None,
        }
        .or_else(|| scientific_cents(rest))
        .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!(
                "-{}{}.{:02}",
                symbol,
                self.dollars().abs(),
                self.cents_part()
            )
        } else {
            format!("{}{}.{:02}", symbol, self.dollars(), self.cents_part())
        }
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// "12.345" style input, rounded to the cent
fn decimal_cents(whole: &str, fraction: &str) -> Option<i64> {
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !(whole.is_empty() || is_digits(whole)) || !(fraction.is_empty() || is_digits(fraction)) {
        return None;
    }

    let dollars: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let digit = |i: usize| fraction.as_bytes().get(i).map_or(0, |d| i64::from(d - b'0'));
    let mut cents = digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        cents += 1;
    }

    dollars.checked_mul(100)?.checked_add(cents)
}

/// "1e2" style input
fn scientific_cents(s: &str) -> Option<i64> {
    if !s.contains(['e', 'E']) {
        return None;
    }
    let cents = (s.parse::<f64>().ok()? * 100.0).round();
    (cents.is_finite() && cents.abs() < i64::MAX as f64).then_some(cents as i64)
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

/// Plain decimal form ("180.00"), also used for CSV export
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.dollars(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(18000)), "180.00");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-10.50");
        assert_eq!(Money::from_cents(5).format_with_symbol("₱"), "₱0.05");
    }

    #[test]
    fn test_times_rounds_to_cent() {
        assert_eq!(Money::from_cents(3000).times(6.0).cents(), 18000);
        assert_eq!(Money::from_cents(3333).times(1.5).cents(), 5000);
        assert_eq!(Money::from_cents(1000).times(0.0).cents(), 0);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("₱10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("--5").is_err());
        assert!(Money::parse("inf").is_err());
    }

    #[test]
    fn test_parse_rounds_extra_decimals() {
        assert_eq!(Money::parse("12.345").unwrap().cents(), 1235);
        assert_eq!(Money::parse("12.344").unwrap().cents(), 1234);
        assert_eq!(Money::parse("0.995").unwrap().cents(), 100);
        assert_eq!(Money::parse("-1.005").unwrap().cents(), -101);
    }

    #[test]
    fn test_parse_scientific_notation() {
        assert_eq!(Money::parse("1e2").unwrap().cents(), 10000);
        assert_eq!(Money::parse("2.5E1").unwrap().cents(), 2500);
        assert!(Money::parse("1e400").is_err());
    }

    #[test]
    fn test_parse_out_of_range_is_an_error() {
        assert!(Money::parse("100000000000000000").is_err());
        assert!(Money::parse("100000000000000000.50").is_err());
        assert!(Money::parse("99999999999999999999999").is_err());
        assert!(Money::parse("1e17").is_err());
    }

    #[test]
    fn test_addition_saturates() {
        let near_max = Money::from_cents(i64::MAX - 1);
        assert_eq!((near_max + Money::from_cents(10)).cents(), i64::MAX);

        let mut total = near_max;
        total += near_max;
        assert_eq!(total.cents(), i64::MAX);

        let sum: Money = [near_max, near_max, near_max].into_iter().sum();
        assert_eq!(sum.cents(), i64::MAX);
    }

    #[test]
    fn test_display_parse_round_trip() {
        for cents in [0, 5, 18000, 123456, -250] {
            let m = Money::from_cents(cents);
            assert_eq!(Money::parse(&m.to_string()).unwrap(), m);
        }
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 600);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");
    }
}
