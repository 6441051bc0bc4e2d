//! SQLite stock adjuster.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::application::ports::{StockAdjusterPort, StockError};
use crate::domain::shared::ProductId;

/// SQLite implementation of `StockAdjusterPort`.
#[derive(Debug, Clone)]
pub struct SqliteStockAdjuster {
    pool: SqlitePool,
}

impl SqliteStockAdjuster {
    /// Create an adjuster on an open pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a product's stock level (seeding/admin use).
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn set_stock(&self, product_id: &ProductId, quantity: u32) -> Result<(), StockError> {
        sqlx::query(
            "INSERT INTO products (id, stock_quantity) VALUES (?1, ?2)
             ON CONFLICT(id) DO UPDATE SET stock_quantity = excluded.stock_quantity",
        )
        .bind(product_id.as_str())
        .bind(i64::from(quantity))
        .execute(&self.pool)
        .await
        .map_err(|e| StockError::Storage {
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Read a product's current stock level.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn stock_of(&self, product_id: &ProductId) -> Result<Option<i64>, StockError> {
        let row = sqlx::query("SELECT stock_quantity FROM products WHERE id = ?1")
            .bind(product_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StockError::Storage {
                message: e.to_string(),
            })?;

        row.map(|row| {
            row.try_get::<i64, _>("stock_quantity")
                .map_err(|e| StockError::Storage {
                    message: e.to_string(),
                })
        })
        .transpose()
    }
}

#[async_trait]
impl StockAdjusterPort for SqliteStockAdjuster {
    async fn decrement_stock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StockError> {
        // One conditional UPDATE, never read-then-write: two confirmations
        // racing on the same product cannot lose an update.
        let result = sqlx::query(
            "UPDATE products
             SET stock_quantity = stock_quantity - ?1
             WHERE id = ?2 AND stock_quantity >= ?1",
        )
        .bind(i64::from(quantity))
        .bind(product_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StockError::Storage {
            message: e.to_string(),
        })?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Zero rows: distinguish a missing product from a short stock.
        match self.stock_of(product_id).await? {
            None => Err(StockError::ProductMissing {
                product_id: product_id.clone(),
            }),
            Some(_) => Err(StockError::Insufficient {
                product_id: product_id.clone(),
                requested: quantity,
            }),
        }
    }
}
