//! Order line items.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{DomainError, Money, ProductId};

/// A line item on an order.
///
/// The unit price is captured at order time and never re-read from the
/// catalog, so later price changes cannot alter a settled order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    product_id: ProductId,
    quantity: u32,
    unit_price: Money,
}

impl OrderItem {
    /// Create a validated line item.
    ///
    /// # Errors
    ///
    /// Returns an error if the product id is empty, the quantity is zero,
    /// or the unit price is negative.
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Result<Self, DomainError> {
        if product_id.is_empty() {
            return Err(DomainError::missing_field("product_id"));
        }
        if quantity == 0 {
            return Err(DomainError::invalid_value(
                "quantity",
                "must be at least 1",
            ));
        }
        if unit_price.amount() < 0 {
            return Err(DomainError::invalid_value(
                "unit_price",
                "cannot be negative",
            ));
        }

        Ok(Self {
            product_id,
            quantity,
            unit_price,
        })
    }

    /// Product being ordered.
    #[must_use]
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Ordered quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price at order time.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Quantity x unit price, refusing on overflow.
    #[must_use]
    pub const fn line_total(&self) -> Option<Money> {
        self.unit_price.checked_mul_quantity(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_item_valid() {
        let item =
            OrderItem::new(ProductId::new("prod-1"), 2, Money::new(15_000)).expect("valid item");
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.line_total(), Some(Money::new(30_000)));
    }

    #[test]
    fn order_item_rejects_zero_quantity() {
        let result = OrderItem::new(ProductId::new("prod-1"), 0, Money::new(15_000));
        assert!(result.is_err());
    }

    #[test]
    fn order_item_rejects_empty_product() {
        let result = OrderItem::new(ProductId::new(""), 1, Money::new(15_000));
        assert!(result.is_err());
    }

    #[test]
    fn order_item_rejects_negative_price() {
        let result = OrderItem::new(ProductId::new("prod-1"), 1, Money::new(-1));
        assert!(result.is_err());
    }

    #[test]
    fn line_total_overflow_is_none() {
        let item = OrderItem::new(ProductId::new("prod-1"), 3, Money::new(i64::MAX / 2))
            .expect("valid item");
        assert!(item.line_total().is_none());
    }
}
