//! Order Repository Trait
//!
//! Defines the persistence abstraction for orders and their line items.
//! Implemented by adapters in the infrastructure layer.
//!
//! The store exposes only row-level operations to this layer; there is no
//! cross-table transaction, which is why creation failure is compensated
//! with an explicit delete and why the confirmation transition is a single
//! conditional update checked by affected-row count.

use async_trait::async_trait;

use super::aggregate::{NewOrder, Order, OrderItem};
use super::errors::OrderError;
use super::value_objects::PaymentRecord;
use crate::domain::shared::{OrderNumber, OrderRecordId, PaymentKey};

/// Repository trait for Order persistence.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert a new order row with status `pending`.
    ///
    /// # Errors
    ///
    /// Returns an error if the order number already exists or the insert
    /// fails.
    async fn insert_order(&self, new_order: &NewOrder) -> Result<Order, OrderError>;

    /// Insert line items for an order.
    ///
    /// On failure the caller is responsible for compensating by deleting
    /// the order row.
    ///
    /// # Errors
    ///
    /// Returns an error if any item insert fails.
    async fn insert_items(
        &self,
        order_id: &OrderRecordId,
        items: &[OrderItem],
    ) -> Result<(), OrderError>;

    /// Find an order by its order number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn find_by_order_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, OrderError>;

    /// Fetch the line items of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn items_for_order(&self, order_id: &OrderRecordId)
        -> Result<Vec<OrderItem>, OrderError>;

    /// Conditionally transition an order `pending -> confirmed`, writing the
    /// payment fields, as one atomic compare-and-swap at the storage layer.
    ///
    /// Returns `None` when zero rows were affected, i.e. the order was no
    /// longer `pending` at update time. That outcome is a signal, not an
    /// error: the caller decides how to surface it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the update itself fails.
    async fn confirm_if_pending(
        &self,
        order_number: &OrderNumber,
        payment: &PaymentRecord,
    ) -> Result<Option<Order>, OrderError>;

    /// Set the order matching a payment key to `cancelled`.
    ///
    /// Unconditional best-effort update; returns the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    async fn cancel_by_payment_key(&self, payment_key: &PaymentKey) -> Result<u64, OrderError>;

    /// Delete an order row. Used only for compensating rollback of a
    /// partially created order.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    async fn delete_order(&self, order_id: &OrderRecordId) -> Result<(), OrderError>;
}
