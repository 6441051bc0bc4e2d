//! Order aggregate root.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order_item::OrderItem;
use crate::domain::orders::errors::OrderError;
use crate::domain::orders::value_objects::{
    CustomerDetails, OrderStatus, PaymentRecord, ShippingDetails,
};
use crate::domain::shared::{Money, OrderNumber, OrderRecordId};

/// Validated input for creating a pending order.
///
/// Construction enforces the creation invariant: the declared total must
/// equal the sum of quantity x unit price across all line items.
#[derive(Debug, Clone)]
pub struct NewOrder {
    order_number: OrderNumber,
    total_amount: Money,
    customer: CustomerDetails,
    shipping: ShippingDetails,
    items: Vec<OrderItem>,
}

impl NewOrder {
    /// Validate creation input.
    ///
    /// # Errors
    ///
    /// Returns an error if the order number is empty, the total is not
    /// positive, the item list is empty, or the declared total does not
    /// match the item sum.
    pub fn new(
        order_number: OrderNumber,
        total_amount: Money,
        customer: CustomerDetails,
        shipping: ShippingDetails,
        items: Vec<OrderItem>,
    ) -> Result<Self, OrderError> {
        if order_number.is_empty() {
            return Err(OrderError::Validation(
                crate::domain::shared::DomainError::missing_field("order_number"),
            ));
        }
        total_amount.validate_for_order()?;
        if items.is_empty() {
            return Err(OrderError::EmptyItems);
        }

        let mut computed = Money::ZERO;
        for item in &items {
            let line = item.line_total().ok_or_else(|| {
                OrderError::Validation(crate::domain::shared::DomainError::invalid_value(
                    "items",
                    "line total overflows",
                ))
            })?;
            computed = computed.checked_add(line).ok_or_else(|| {
                OrderError::Validation(crate::domain::shared::DomainError::invalid_value(
                    "items",
                    "order total overflows",
                ))
            })?;
        }
        if computed != total_amount {
            return Err(OrderError::TotalMismatch {
                declared: total_amount,
                computed,
            });
        }

        Ok(Self {
            order_number,
            total_amount,
            customer,
            shipping,
            items,
        })
    }

    /// Order number chosen by the caller.
    #[must_use]
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// Declared total amount.
    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Customer details.
    #[must_use]
    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    /// Shipping details.
    #[must_use]
    pub fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    /// Line items.
    #[must_use]
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }
}

/// A persisted order.
///
/// `total_amount` is immutable after creation; every later confirmation is
/// checked against it. Status moves `pending -> confirmed` or
/// `pending/confirmed -> cancelled`, each at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderRecordId,
    order_number: OrderNumber,
    total_amount: Money,
    status: OrderStatus,
    customer: CustomerDetails,
    shipping: ShippingDetails,
    payment: Option<PaymentRecord>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Materialize a freshly inserted pending order.
    #[must_use]
    pub fn pending(id: OrderRecordId, new_order: &NewOrder) -> Self {
        let now = Utc::now();
        Self {
            id,
            order_number: new_order.order_number.clone(),
            total_amount: new_order.total_amount,
            status: OrderStatus::Pending,
            customer: new_order.customer.clone(),
            shipping: new_order.shipping.clone(),
            payment: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an order from stored fields (adapter use).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_stored(
        id: OrderRecordId,
        order_number: OrderNumber,
        total_amount: Money,
        status: OrderStatus,
        customer: CustomerDetails,
        shipping: ShippingDetails,
        payment: Option<PaymentRecord>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            order_number,
            total_amount,
            status,
            customer,
            shipping,
            payment,
            created_at,
            updated_at,
        }
    }

    /// Internal store id.
    #[must_use]
    pub fn id(&self) -> &OrderRecordId {
        &self.id
    }

    /// Human-readable order number.
    #[must_use]
    pub fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// Immutable order total.
    #[must_use]
    pub const fn total_amount(&self) -> Money {
        self.total_amount
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Customer details.
    #[must_use]
    pub fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    /// Shipping details.
    #[must_use]
    pub fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    /// Payment record, present once confirmed.
    #[must_use]
    pub fn payment(&self) -> Option<&PaymentRecord> {
        self.payment.as_ref()
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last-update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Transition `pending -> confirmed`, recording the settled payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not pending.
    pub fn confirm(&mut self, payment: PaymentRecord) -> Result<(), OrderError> {
        if !self.status.is_confirmable() {
            return Err(OrderError::InvalidStateTransition {
                from: self.status,
                to: OrderStatus::Confirmed,
            });
        }
        self.status = OrderStatus::Confirmed;
        self.payment = Some(payment);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Transition to `cancelled`.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is already cancelled.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if self.status == OrderStatus::Cancelled {
            return Err(OrderError::InvalidStateTransition {
                from: self.status,
                to: OrderStatus::Cancelled,
            });
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::{PaymentKey, ProductId};

    fn customer() -> CustomerDetails {
        CustomerDetails::new("Hong Gildong", "010-1234-5678", "hong@example.com").unwrap()
    }

    fn shipping() -> ShippingDetails {
        ShippingDetails::new("12 Teheran-ro, Seoul", "06234", None).unwrap()
    }

    fn items() -> Vec<OrderItem> {
        vec![
            OrderItem::new(ProductId::new("prod-1"), 2, Money::new(15_000)).unwrap(),
            OrderItem::new(ProductId::new("prod-2"), 1, Money::new(20_000)).unwrap(),
        ]
    }

    fn new_order() -> NewOrder {
        NewOrder::new(
            OrderNumber::new("A-1001"),
            Money::new(50_000),
            customer(),
            shipping(),
            items(),
        )
        .unwrap()
    }

    #[test]
    fn new_order_accepts_matching_total() {
        let order = new_order();
        assert_eq!(order.total_amount(), Money::new(50_000));
        assert_eq!(order.items().len(), 2);
    }

    #[test]
    fn new_order_rejects_total_mismatch() {
        let result = NewOrder::new(
            OrderNumber::new("A-1001"),
            Money::new(49_999),
            customer(),
            shipping(),
            items(),
        );
        assert!(matches!(result, Err(OrderError::TotalMismatch { .. })));
    }

    #[test]
    fn new_order_rejects_empty_items() {
        let result = NewOrder::new(
            OrderNumber::new("A-1001"),
            Money::new(50_000),
            customer(),
            shipping(),
            vec![],
        );
        assert!(matches!(result, Err(OrderError::EmptyItems)));
    }

    #[test]
    fn new_order_rejects_empty_number() {
        let result = NewOrder::new(
            OrderNumber::new(""),
            Money::new(50_000),
            customer(),
            shipping(),
            items(),
        );
        assert!(matches!(result, Err(OrderError::Validation(_))));
    }

    #[test]
    fn new_order_rejects_non_positive_total() {
        let result = NewOrder::new(
            OrderNumber::new("A-1001"),
            Money::ZERO,
            customer(),
            shipping(),
            vec![],
        );
        assert!(result.is_err());
    }

    #[test]
    fn pending_order_starts_without_payment() {
        let order = Order::pending(OrderRecordId::generate(), &new_order());
        assert_eq!(order.status(), OrderStatus::Pending);
        assert!(order.payment().is_none());
    }

    #[test]
    fn confirm_transitions_once() {
        let mut order = Order::pending(OrderRecordId::generate(), &new_order());
        let record = PaymentRecord::new(PaymentKey::new("pay_abc"), "card", Utc::now());

        order.confirm(record.clone()).unwrap();
        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert_eq!(order.payment().unwrap().payment_key.as_str(), "pay_abc");

        let replay = order.confirm(record);
        assert!(matches!(
            replay,
            Err(OrderError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn cancel_from_pending_and_confirmed() {
        let mut pending = Order::pending(OrderRecordId::generate(), &new_order());
        assert!(pending.cancel().is_ok());

        let mut confirmed = Order::pending(OrderRecordId::generate(), &new_order());
        confirmed
            .confirm(PaymentRecord::new(
                PaymentKey::new("pay_abc"),
                "card",
                Utc::now(),
            ))
            .unwrap();
        assert!(confirmed.cancel().is_ok());
    }

    #[test]
    fn cancel_is_terminal() {
        let mut order = Order::pending(OrderRecordId::generate(), &new_order());
        order.cancel().unwrap();
        assert!(order.cancel().is_err());
        assert!(order
            .confirm(PaymentRecord::new(
                PaymentKey::new("pay_abc"),
                "card",
                Utc::now()
            ))
            .is_err());
    }
}
