//! Money value object for currency amounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

use crate::domain::shared::DomainError;

/// A monetary amount in the smallest currency unit (whole KRW).
///
/// Represented as an integer; every comparison in the settlement path is an
/// exact equality check against this value, so no fractional arithmetic is
/// ever performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a new Money value from the smallest currency unit.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Get the inner integer value.
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Returns true if this amount is positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Returns true if this amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiply a unit price by a quantity, refusing on overflow.
    #[must_use]
    pub const fn checked_mul_quantity(&self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as i64) {
            Some(total) => Some(Self(total)),
            None => None,
        }
    }

    /// Add two amounts, refusing on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(total) => Some(Self(total)),
            None => None,
        }
    }

    /// Check that the amount is valid as an order total.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not strictly positive.
    pub fn validate_for_order(&self) -> Result<(), DomainError> {
        if !self.is_positive() {
            return Err(DomainError::invalid_value(
                "total_amount",
                "order total must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_new_and_amount() {
        let amount = Money::new(50_000);
        assert_eq!(amount.amount(), 50_000);
    }

    #[test]
    fn money_is_positive() {
        assert!(Money::new(1).is_positive());
        assert!(!Money::ZERO.is_positive());
        assert!(!Money::new(-1).is_positive());
    }

    #[test]
    fn money_checked_mul_quantity() {
        let price = Money::new(12_000);
        assert_eq!(price.checked_mul_quantity(3), Some(Money::new(36_000)));
        assert!(Money::new(i64::MAX).checked_mul_quantity(2).is_none());
    }

    #[test]
    fn money_checked_add() {
        let a = Money::new(30_000);
        let b = Money::new(20_000);
        assert_eq!(a.checked_add(b), Some(Money::new(50_000)));
        assert!(Money::new(i64::MAX).checked_add(Money::new(1)).is_none());
    }

    #[test]
    fn money_validate_for_order() {
        assert!(Money::new(50_000).validate_for_order().is_ok());
        assert!(Money::ZERO.validate_for_order().is_err());
        assert!(Money::new(-100).validate_for_order().is_err());
    }

    #[test]
    fn money_serde_is_transparent() {
        let amount = Money::new(50_000);
        assert_eq!(serde_json::to_string(&amount).unwrap(), "50000");

        let parsed: Money = serde_json::from_str("49999").unwrap();
        assert_eq!(parsed, Money::new(49_999));
    }

    #[test]
    fn money_display() {
        assert_eq!(format!("{}", Money::new(50_000)), "50000");
    }

    #[test]
    fn money_ordering() {
        assert!(Money::new(49_999) < Money::new(50_000));
    }
}
