//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog quotes prices as JSON numbers in a currency-agnostic unit.
//! They are parsed straight into [`Decimal`] so that cart arithmetic never
//! accumulates floating point error. Rounding to cents happens only in
//! [`Price::display`].

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Symbol prepended by [`Price::display`].
pub const CURRENCY_SYMBOL: &str = "$";

/// A non-rounded monetary amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Apply a percentage discount.
    ///
    /// The percentage is clamped into `0..=100` so the result is never
    /// negative and never exceeds the original price.
    #[must_use]
    pub fn discounted(self, percentage: Decimal) -> Self {
        let percentage = percentage.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
        let factor = Decimal::ONE - percentage / Decimal::ONE_HUNDRED;
        Self((self.0 * factor).max(Decimal::ZERO))
    }

    /// Amount rounded half-away-from-zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{CURRENCY_SYMBOL}{:.2}", self.rounded())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

// Prices travel as JSON numbers, matching the catalog wire format.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap_or_default()
    }

    #[test]
    fn test_discounted_price() {
        let price = Price::new(dec("100"));
        assert_eq!(price.discounted(dec("20")).amount(), dec("80"));
        assert_eq!(price.discounted(Decimal::ZERO).amount(), dec("100"));
    }

    #[test]
    fn test_discount_is_clamped() {
        let price = Price::new(dec("50"));
        assert_eq!(price.discounted(dec("150")).amount(), Decimal::ZERO);
        assert_eq!(price.discounted(dec("-10")).amount(), dec("50"));
    }

    #[test]
    fn test_display_rounds_only_at_presentation() {
        let price = Price::new(dec("9.99")).discounted(dec("12.5"));
        // 9.99 * 0.875 = 8.74125, kept at full precision internally
        assert_eq!(price.amount(), dec("8.74125"));
        assert_eq!(price.display(), "$8.74");
        assert_eq!(Price::new(dec("0.125")).display(), "$0.13");
    }

    #[test]
    fn test_sum_and_multiply() {
        let total: Price = [Price::new(dec("1.5")) * 2, Price::new(dec("0.25"))]
            .into_iter()
            .sum();
        assert_eq!(total.amount(), dec("3.25"));
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("9.99").unwrap_or_default();
        assert_eq!(price.amount(), dec("9.99"));
    }
}
