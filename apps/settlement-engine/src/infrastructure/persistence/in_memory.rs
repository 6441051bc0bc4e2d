//! In-memory adapters for testing and development.
//!
//! Both adapters reproduce the storage-layer atomicity the production
//! adapters rely on: the confirmation CAS and the conditional stock
//! decrement each run under a single write lock.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::application::ports::{StockAdjusterPort, StockError};
use crate::domain::orders::aggregate::{NewOrder, Order, OrderItem};
use crate::domain::orders::errors::OrderError;
use crate::domain::orders::repository::OrderRepository;
use crate::domain::orders::value_objects::{OrderStatus, PaymentRecord};
use crate::domain::shared::{OrderNumber, OrderRecordId, PaymentKey, ProductId};

/// In-memory implementation of `OrderRepository`.
///
/// Suitable for testing and development. Not for production use.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    /// Orders keyed by order number.
    orders: RwLock<HashMap<String, Order>>,
    /// Line items keyed by internal order id.
    items: RwLock<HashMap<String, Vec<OrderItem>>>,
}

impl InMemoryOrderRepository {
    /// Create a new empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().unwrap().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().unwrap().is_empty()
    }

    /// Total number of stored line items.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.read().unwrap().values().map(Vec::len).sum()
    }

    /// Add an order directly (for test setup).
    pub fn add(&self, order: Order) {
        let mut orders = self.orders.write().unwrap();
        orders.insert(order.order_number().as_str().to_string(), order);
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert_order(&self, new_order: &NewOrder) -> Result<Order, OrderError> {
        let mut orders = self.orders.write().unwrap();
        let key = new_order.order_number().as_str().to_string();
        if orders.contains_key(&key) {
            return Err(OrderError::DuplicateOrderNumber { order_number: key });
        }
        let order = Order::pending(OrderRecordId::generate(), new_order);
        orders.insert(key, order.clone());
        Ok(order)
    }

    async fn insert_items(
        &self,
        order_id: &OrderRecordId,
        items: &[OrderItem],
    ) -> Result<(), OrderError> {
        let mut map = self.items.write().unwrap();
        map.insert(order_id.as_str().to_string(), items.to_vec());
        Ok(())
    }

    async fn find_by_order_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, OrderError> {
        let orders = self.orders.read().unwrap();
        Ok(orders.get(order_number.as_str()).cloned())
    }

    async fn items_for_order(
        &self,
        order_id: &OrderRecordId,
    ) -> Result<Vec<OrderItem>, OrderError> {
        let map = self.items.read().unwrap();
        Ok(map.get(order_id.as_str()).cloned().unwrap_or_default())
    }

    async fn confirm_if_pending(
        &self,
        order_number: &OrderNumber,
        payment: &PaymentRecord,
    ) -> Result<Option<Order>, OrderError> {
        // Single critical section: check-and-set under one write lock.
        let mut orders = self.orders.write().unwrap();
        match orders.get_mut(order_number.as_str()) {
            Some(order) if order.status() == OrderStatus::Pending => {
                order
                    .confirm(payment.clone())
                    .map_err(|e| OrderError::storage(e.to_string()))?;
                Ok(Some(order.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn cancel_by_payment_key(&self, payment_key: &PaymentKey) -> Result<u64, OrderError> {
        let mut orders = self.orders.write().unwrap();
        let mut rows = 0;
        for order in orders.values_mut() {
            if order
                .payment()
                .is_some_and(|p| &p.payment_key == payment_key)
            {
                rows += 1;
                if order.status() != OrderStatus::Cancelled {
                    let _ = order.cancel();
                }
            }
        }
        Ok(rows)
    }

    async fn delete_order(&self, order_id: &OrderRecordId) -> Result<(), OrderError> {
        let mut orders = self.orders.write().unwrap();
        orders.retain(|_, order| order.id() != order_id);
        let mut items = self.items.write().unwrap();
        items.remove(order_id.as_str());
        Ok(())
    }
}

/// In-memory implementation of `StockAdjusterPort`.
#[derive(Debug, Default)]
pub struct InMemoryStockAdjuster {
    stock: RwLock<HashMap<String, u32>>,
}

impl InMemoryStockAdjuster {
    /// Create a new empty adjuster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a product's stock level (for test setup).
    pub fn set_stock(&self, product_id: &ProductId, quantity: u32) {
        let mut stock = self.stock.write().unwrap();
        stock.insert(product_id.as_str().to_string(), quantity);
    }

    /// Read a product's stock level.
    #[must_use]
    pub fn stock_of(&self, product_id: &ProductId) -> Option<u32> {
        let stock = self.stock.read().unwrap();
        stock.get(product_id.as_str()).copied()
    }
}

#[async_trait]
impl StockAdjusterPort for InMemoryStockAdjuster {
    async fn decrement_stock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StockError> {
        // Check-and-decrement under one write lock; no lost updates.
        let mut stock = self.stock.write().unwrap();
        match stock.get_mut(product_id.as_str()) {
            None => Err(StockError::ProductMissing {
                product_id: product_id.clone(),
            }),
            Some(remaining) if *remaining >= quantity => {
                *remaining -= quantity;
                Ok(())
            }
            Some(_) => Err(StockError::Insufficient {
                product_id: product_id.clone(),
                requested: quantity,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::orders::value_objects::{CustomerDetails, ShippingDetails};
    use crate::domain::shared::Money;
    use chrono::Utc;

    fn new_order(number: &str) -> NewOrder {
        NewOrder::new(
            OrderNumber::new(number),
            Money::new(50_000),
            CustomerDetails::new("Hong Gildong", "010-1234-5678", "hong@example.com").unwrap(),
            ShippingDetails::new("12 Teheran-ro, Seoul", "06234", None).unwrap(),
            vec![
                OrderItem::new(ProductId::new("prod-1"), 2, Money::new(15_000)).unwrap(),
                OrderItem::new(ProductId::new("prod-2"), 1, Money::new(20_000)).unwrap(),
            ],
        )
        .unwrap()
    }

    fn payment_record(key: &str) -> PaymentRecord {
        PaymentRecord::new(PaymentKey::new(key), "card", Utc::now())
    }

    #[tokio::test]
    async fn insert_and_find_by_order_number() {
        let repo = InMemoryOrderRepository::new();
        let order = repo.insert_order(&new_order("A-1001")).await.unwrap();

        let found = repo
            .find_by_order_number(&OrderNumber::new("A-1001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), order.id());
        assert_eq!(found.status(), OrderStatus::Pending);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_order_number() {
        let repo = InMemoryOrderRepository::new();
        repo.insert_order(&new_order("A-1001")).await.unwrap();

        let result = repo.insert_order(&new_order("A-1001")).await;
        assert!(matches!(
            result,
            Err(OrderError::DuplicateOrderNumber { .. })
        ));
    }

    #[tokio::test]
    async fn items_round_trip() {
        let repo = InMemoryOrderRepository::new();
        let draft = new_order("A-1001");
        let order = repo.insert_order(&draft).await.unwrap();
        repo.insert_items(order.id(), draft.items()).await.unwrap();

        let items = repo.items_for_order(order.id()).await.unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn confirm_if_pending_applies_once() {
        let repo = InMemoryOrderRepository::new();
        let number = OrderNumber::new("A-1001");
        repo.insert_order(&new_order("A-1001")).await.unwrap();

        let first = repo
            .confirm_if_pending(&number, &payment_record("pay_first"))
            .await
            .unwrap();
        assert!(first.is_some());

        let second = repo
            .confirm_if_pending(&number, &payment_record("pay_second"))
            .await
            .unwrap();
        assert!(second.is_none());

        // First writer's fields survive the lost replay.
        let stored = repo.find_by_order_number(&number).await.unwrap().unwrap();
        assert_eq!(stored.payment().unwrap().payment_key.as_str(), "pay_first");
    }

    #[tokio::test]
    async fn concurrent_confirmations_only_one_wins() {
        let repo = std::sync::Arc::new(InMemoryOrderRepository::new());
        repo.insert_order(&new_order("A-1001")).await.unwrap();

        let a = {
            let repo = std::sync::Arc::clone(&repo);
            tokio::spawn(async move {
                repo.confirm_if_pending(&OrderNumber::new("A-1001"), &payment_record("pay_a"))
                    .await
                    .unwrap()
            })
        };
        let b = {
            let repo = std::sync::Arc::clone(&repo);
            tokio::spawn(async move {
                repo.confirm_if_pending(&OrderNumber::new("A-1001"), &payment_record("pay_b"))
                    .await
                    .unwrap()
            })
        };

        let (a, b) = (a.await.unwrap(), b.await.unwrap());
        assert_eq!(
            u32::from(a.is_some()) + u32::from(b.is_some()),
            1,
            "exactly one confirmation must win the CAS"
        );
    }

    #[tokio::test]
    async fn confirm_unknown_order_is_not_applied() {
        let repo = InMemoryOrderRepository::new();
        let result = repo
            .confirm_if_pending(&OrderNumber::new("missing"), &payment_record("pay_x"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn cancel_by_payment_key_matches_confirmed_order() {
        let repo = InMemoryOrderRepository::new();
        let number = OrderNumber::new("A-1001");
        repo.insert_order(&new_order("A-1001")).await.unwrap();
        repo.confirm_if_pending(&number, &payment_record("pay_abc"))
            .await
            .unwrap();

        let rows = repo
            .cancel_by_payment_key(&PaymentKey::new("pay_abc"))
            .await
            .unwrap();
        assert_eq!(rows, 1);

        let stored = repo.find_by_order_number(&number).await.unwrap().unwrap();
        assert_eq!(stored.status(), OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancel_unknown_payment_key_touches_nothing() {
        let repo = InMemoryOrderRepository::new();
        repo.insert_order(&new_order("A-1001")).await.unwrap();

        let rows = repo
            .cancel_by_payment_key(&PaymentKey::new("pay_unknown"))
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn delete_order_removes_row_and_items() {
        let repo = InMemoryOrderRepository::new();
        let draft = new_order("A-1001");
        let order = repo.insert_order(&draft).await.unwrap();
        repo.insert_items(order.id(), draft.items()).await.unwrap();

        repo.delete_order(order.id()).await.unwrap();

        assert!(repo.is_empty());
        assert_eq!(repo.item_count(), 0);
    }

    #[tokio::test]
    async fn stock_decrement_happy_path() {
        let stock = InMemoryStockAdjuster::new();
        let product = ProductId::new("prod-1");
        stock.set_stock(&product, 10);

        stock.decrement_stock(&product, 3).await.unwrap();
        assert_eq!(stock.stock_of(&product), Some(7));
    }

    #[tokio::test]
    async fn stock_decrement_refuses_when_insufficient() {
        let stock = InMemoryStockAdjuster::new();
        let product = ProductId::new("prod-1");
        stock.set_stock(&product, 2);

        let result = stock.decrement_stock(&product, 3).await;
        assert!(matches!(result, Err(StockError::Insufficient { .. })));
        // Refusal is a no-op.
        assert_eq!(stock.stock_of(&product), Some(2));
    }

    #[tokio::test]
    async fn stock_decrement_unknown_product() {
        let stock = InMemoryStockAdjuster::new();
        let result = stock.decrement_stock(&ProductId::new("ghost"), 1).await;
        assert!(matches!(result, Err(StockError::ProductMissing { .. })));
    }

    #[tokio::test]
    async fn stock_can_reach_exactly_zero() {
        let stock = InMemoryStockAdjuster::new();
        let product = ProductId::new("prod-1");
        stock.set_stock(&product, 3);

        stock.decrement_stock(&product, 3).await.unwrap();
        assert_eq!(stock.stock_of(&product), Some(0));

        let result = stock.decrement_stock(&product, 1).await;
        assert!(matches!(result, Err(StockError::Insufficient { .. })));
    }
}
