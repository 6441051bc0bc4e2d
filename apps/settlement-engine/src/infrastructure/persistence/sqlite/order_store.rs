//! SQLite order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::orders::aggregate::{NewOrder, Order, OrderItem};
use crate::domain::orders::errors::OrderError;
use crate::domain::orders::repository::OrderRepository;
use crate::domain::orders::value_objects::{
    CustomerDetails, OrderStatus, PaymentRecord, ShippingDetails,
};
use crate::domain::shared::{Money, OrderNumber, OrderRecordId, PaymentKey, ProductId};

/// SQLite implementation of `OrderRepository`.
#[derive(Debug, Clone)]
pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    /// Create a repository on an open pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn storage_err(err: sqlx::Error) -> OrderError {
    OrderError::storage(err.to_string())
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, OrderError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| OrderError::storage(format!("corrupt {column} timestamp '{value}': {e}")))
}

/// Rebuild the domain order from a row.
fn row_to_order(row: &SqliteRow) -> Result<Order, OrderError> {
    let status_text: String = row.try_get("status").map_err(storage_err)?;
    let status = OrderStatus::parse(&status_text)
        .ok_or_else(|| OrderError::storage(format!("unknown order status '{status_text}'")))?;

    let customer = CustomerDetails::new(
        row.try_get::<String, _>("customer_name").map_err(storage_err)?,
        row.try_get::<String, _>("customer_phone").map_err(storage_err)?,
        row.try_get::<String, _>("customer_email").map_err(storage_err)?,
    )
    .map_err(|e| OrderError::storage(format!("corrupt customer fields: {e}")))?;

    let shipping = ShippingDetails::new(
        row.try_get::<String, _>("shipping_address").map_err(storage_err)?,
        row.try_get::<String, _>("shipping_postcode").map_err(storage_err)?,
        Some(row.try_get::<String, _>("shipping_note").map_err(storage_err)?),
    )
    .map_err(|e| OrderError::storage(format!("corrupt shipping fields: {e}")))?;

    let payment_key: Option<String> = row.try_get("payment_key").map_err(storage_err)?;
    let payment = payment_key
        .map(|key| -> Result<PaymentRecord, OrderError> {
            let method: Option<String> = row.try_get("payment_method").map_err(storage_err)?;
            let approved_at: Option<String> =
                row.try_get("payment_approved_at").map_err(storage_err)?;
            let approved_at = approved_at
                .ok_or_else(|| OrderError::storage("payment_key without payment_approved_at"))?;
            Ok(PaymentRecord::new(
                PaymentKey::new(key),
                method.unwrap_or_default(),
                parse_timestamp(&approved_at, "payment_approved_at")?,
            ))
        })
        .transpose()?;

    let created_at: String = row.try_get("created_at").map_err(storage_err)?;
    let updated_at: String = row.try_get("updated_at").map_err(storage_err)?;

    Ok(Order::from_stored(
        OrderRecordId::new(row.try_get::<String, _>("id").map_err(storage_err)?),
        OrderNumber::new(row.try_get::<String, _>("order_number").map_err(storage_err)?),
        Money::new(row.try_get::<i64, _>("total_amount").map_err(storage_err)?),
        status,
        customer,
        shipping,
        payment,
        parse_timestamp(&created_at, "created_at")?,
        parse_timestamp(&updated_at, "updated_at")?,
    ))
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn insert_order(&self, new_order: &NewOrder) -> Result<Order, OrderError> {
        let order = Order::pending(OrderRecordId::generate(), new_order);

        let result = sqlx::query(
            "INSERT INTO orders (
                id, order_number, total_amount, status,
                customer_name, customer_phone, customer_email,
                shipping_address, shipping_postcode, shipping_note,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(order.id().as_str())
        .bind(order.order_number().as_str())
        .bind(order.total_amount().amount())
        .bind(order.status().as_str())
        .bind(order.customer().name())
        .bind(order.customer().phone())
        .bind(order.customer().email())
        .bind(order.shipping().address())
        .bind(order.shipping().postcode())
        .bind(order.shipping().note())
        .bind(order.created_at().to_rfc3339())
        .bind(order.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(order),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(OrderError::DuplicateOrderNumber {
                    order_number: order.order_number().as_str().to_string(),
                })
            }
            Err(e) => Err(storage_err(e)),
        }
    }

    async fn insert_items(
        &self,
        order_id: &OrderRecordId,
        items: &[OrderItem],
    ) -> Result<(), OrderError> {
        for item in items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, price)
                 VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(order_id.as_str())
            .bind(item.product_id().as_str())
            .bind(i64::from(item.quantity()))
            .bind(item.unit_price().amount())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;
        }
        Ok(())
    }

    async fn find_by_order_number(
        &self,
        order_number: &OrderNumber,
    ) -> Result<Option<Order>, OrderError> {
        let row = sqlx::query("SELECT * FROM orders WHERE order_number = ?1")
            .bind(order_number.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_err)?;

        row.as_ref().map(row_to_order).transpose()
    }

    async fn items_for_order(
        &self,
        order_id: &OrderRecordId,
    ) -> Result<Vec<OrderItem>, OrderError> {
        let rows = sqlx::query(
            "SELECT product_id, quantity, price FROM order_items WHERE order_id = ?1",
        )
        .bind(order_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_err)?;

        rows.iter()
            .map(|row| {
                let product_id: String = row.try_get("product_id").map_err(storage_err)?;
                let quantity: i64 = row.try_get("quantity").map_err(storage_err)?;
                let price: i64 = row.try_get("price").map_err(storage_err)?;
                let quantity = u32::try_from(quantity)
                    .map_err(|_| OrderError::storage(format!("corrupt quantity {quantity}")))?;
                OrderItem::new(ProductId::new(product_id), quantity, Money::new(price))
                    .map_err(|e| OrderError::storage(format!("corrupt order item: {e}")))
            })
            .collect()
    }

    async fn confirm_if_pending(
        &self,
        order_number: &OrderNumber,
        payment: &PaymentRecord,
    ) -> Result<Option<Order>, OrderError> {
        // The compare-and-swap: one conditional UPDATE, decided by the
        // affected-row count.
        let result = sqlx::query(
            "UPDATE orders SET
                status = 'confirmed',
                payment_key = ?1,
                payment_method = ?2,
                payment_approved_at = ?3,
                updated_at = ?4
             WHERE order_number = ?5 AND status = 'pending'",
        )
        .bind(payment.payment_key.as_str())
        .bind(&payment.method)
        .bind(payment.approved_at.to_rfc3339())
        .bind(Utc::now().to_rfc3339())
        .bind(order_number.as_str())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let confirmed = self
            .find_by_order_number(order_number)
            .await?
            .ok_or_else(|| OrderError::storage("confirmed order row disappeared"))?;
        Ok(Some(confirmed))
    }

    async fn cancel_by_payment_key(&self, payment_key: &PaymentKey) -> Result<u64, OrderError> {
        let result = sqlx::query(
            "UPDATE orders SET status = 'cancelled', updated_at = ?1 WHERE payment_key = ?2",
        )
        .bind(Utc::now().to_rfc3339())
        .bind(payment_key.as_str())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(result.rows_affected())
    }

    async fn delete_order(&self, order_id: &OrderRecordId) -> Result<(), OrderError> {
        sqlx::query("DELETE FROM order_items WHERE order_id = ?1")
            .bind(order_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        sqlx::query("DELETE FROM orders WHERE id = ?1")
            .bind(order_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::test_support::temp_pool;

    fn new_order(number: &str) -> NewOrder {
        NewOrder::new(
            OrderNumber::new(number),
            Money::new(50_000),
            CustomerDetails::new("Hong Gildong", "010-1234-5678", "hong@example.com").unwrap(),
            ShippingDetails::new(
                "12 Teheran-ro, Seoul",
                "06234",
                Some("leave at the door".to_string()),
            )
            .unwrap(),
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

    async fn order_count(pool: &SqlitePool) -> i64 {
        sqlx::query("SELECT COUNT(*) AS n FROM orders")
            .fetch_one(pool)
            .await
            .unwrap()
            .try_get("n")
            .unwrap()
    }

    async fn item_count(pool: &SqlitePool) -> i64 {
        sqlx::query("SELECT COUNT(*) AS n FROM order_items")
            .fetch_one(pool)
            .await
            .unwrap()
            .try_get("n")
            .unwrap()
    }

    #[tokio::test]
    async fn insert_and_find_round_trip() {
        let (_dir, pool) = temp_pool().await;
        let repo = SqliteOrderRepository::new(pool);

        let inserted = repo.insert_order(&new_order("A-1001")).await.unwrap();

        let found = repo
            .find_by_order_number(&OrderNumber::new("A-1001"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id(), inserted.id());
        assert_eq!(found.status(), OrderStatus::Pending);
        assert_eq!(found.total_amount(), Money::new(50_000));
        assert_eq!(found.customer().email(), "hong@example.com");
        assert_eq!(found.shipping().note(), "leave at the door");
        assert!(found.payment().is_none());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_order_number() {
        let (_dir, pool) = temp_pool().await;
        let repo = SqliteOrderRepository::new(pool);

        repo.insert_order(&new_order("A-1001")).await.unwrap();
        let result = repo.insert_order(&new_order("A-1001")).await;
        assert!(matches!(
            result,
            Err(OrderError::DuplicateOrderNumber { .. })
        ));
    }

    #[tokio::test]
    async fn find_unknown_order_is_none() {
        let (_dir, pool) = temp_pool().await;
        let repo = SqliteOrderRepository::new(pool);

        let found = repo
            .find_by_order_number(&OrderNumber::new("missing"))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn items_round_trip() {
        let (_dir, pool) = temp_pool().await;
        let repo = SqliteOrderRepository::new(pool);

        let draft = new_order("A-1001");
        let order = repo.insert_order(&draft).await.unwrap();
        repo.insert_items(order.id(), draft.items()).await.unwrap();

        let mut items = repo.items_for_order(order.id()).await.unwrap();
        items.sort_by(|a, b| a.product_id().as_str().cmp(b.product_id().as_str()));
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id().as_str(), "prod-1");
        assert_eq!(items[0].quantity(), 2);
        assert_eq!(items[0].unit_price(), Money::new(15_000));
    }

    #[tokio::test]
    async fn confirm_if_pending_applies_exactly_once() {
        let (_dir, pool) = temp_pool().await;
        let repo = SqliteOrderRepository::new(pool);
        let number = OrderNumber::new("A-1001");

        repo.insert_order(&new_order("A-1001")).await.unwrap();

        let first = repo
            .confirm_if_pending(&number, &payment_record("pay_first"))
            .await
            .unwrap();
        let confirmed = first.unwrap();
        assert_eq!(confirmed.status(), OrderStatus::Confirmed);
        assert_eq!(
            confirmed.payment().unwrap().payment_key.as_str(),
            "pay_first"
        );

        // Replay: zero rows affected, stored fields untouched.
        let second = repo
            .confirm_if_pending(&number, &payment_record("pay_second"))
            .await
            .unwrap();
        assert!(second.is_none());

        let stored = repo.find_by_order_number(&number).await.unwrap().unwrap();
        assert_eq!(stored.payment().unwrap().payment_key.as_str(), "pay_first");
    }

    #[tokio::test]
    async fn racing_confirmations_only_one_wins() {
        let (_dir, pool) = temp_pool().await;
        let repo = std::sync::Arc::new(SqliteOrderRepository::new(pool));
        repo.insert_order(&new_order("A-1001")).await.unwrap();

        let number_a = OrderNumber::new("A-1001");
        let number_b = OrderNumber::new("A-1001");
        let payment_a = payment_record("pay_a");
        let payment_b = payment_record("pay_b");
        let (a, b) = tokio::join!(
            repo.confirm_if_pending(&number_a, &payment_a),
            repo.confirm_if_pending(&number_b, &payment_b),
        );

        let wins = u32::from(a.unwrap().is_some()) + u32::from(b.unwrap().is_some());
        assert_eq!(wins, 1, "exactly one confirmation must win the CAS");
    }

    #[tokio::test]
    async fn cancel_by_payment_key_updates_matching_row() {
        let (_dir, pool) = temp_pool().await;
        let repo = SqliteOrderRepository::new(pool);
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

        let rows = repo
            .cancel_by_payment_key(&PaymentKey::new("pay_unknown"))
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn delete_order_removes_row_and_items() {
        let (_dir, pool) = temp_pool().await;
        let repo = SqliteOrderRepository::new(pool.clone());

        let draft = new_order("A-1001");
        let order = repo.insert_order(&draft).await.unwrap();
        repo.insert_items(order.id(), draft.items()).await.unwrap();
        assert_eq!(order_count(&pool).await, 1);
        assert_eq!(item_count(&pool).await, 2);

        repo.delete_order(order.id()).await.unwrap();

        assert_eq!(order_count(&pool).await, 0);
        assert_eq!(item_count(&pool).await, 0);
    }
}
