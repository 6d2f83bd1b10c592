//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in the store's single display currency.
///
/// Wraps [`Decimal`] so prices never round through floating point.
/// Serializes as a JSON string (`"10.50"`), `Decimal`'s default serde
/// representation, matching the document shapes the web frontends
/// already consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * Decimal::from(rhs))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_display_two_decimals() {
        let price = Price::new(Decimal::new(1050, 2)); // 10.50
        assert_eq!(price.to_string(), "10.50");
    }

    #[test]
    fn test_add() {
        let a = Price::new(Decimal::new(100, 2));
        let b = Price::new(Decimal::new(250, 2));
        assert_eq!((a + b).amount(), Decimal::new(350, 2));
    }

    #[test]
    fn test_mul_quantity() {
        let unit = Price::new(Decimal::new(199, 2)); // 1.99
        assert_eq!((unit * 3).amount(), Decimal::new(597, 2));
    }

    #[test]
    fn test_serde_string() {
        let price = Price::new(Decimal::new(2000, 2));
        let json = serde_json::to_string(&price).unwrap();
        let parsed: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, price);
    }
}
