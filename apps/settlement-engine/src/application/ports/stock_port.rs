//! Stock Adjuster Port (Driven Port)
//!
//! One primitive: atomically decrement a product's stock, refusing if the
//! result would go negative. Implementations must express this as a single
//! conditional update at the storage layer, never read-then-write, so that
//! concurrent confirmations touching the same product cannot lose updates.

use async_trait::async_trait;

use crate::domain::shared::ProductId;

/// Stock adjustment error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StockError {
    /// Remaining stock is smaller than the requested quantity; nothing was
    /// changed.
    #[error("Insufficient stock for product {product_id}: requested {requested}")]
    Insufficient {
        /// Product whose stock was too low.
        product_id: ProductId,
        /// Quantity that was requested.
        requested: u32,
    },

    /// The product row does not exist.
    #[error("Product not found: {product_id}")]
    ProductMissing {
        /// The missing product.
        product_id: ProductId,
    },

    /// Underlying store failure.
    #[error("Stock store failure: {message}")]
    Storage {
        /// Error details.
        message: String,
    },
}

/// Port for inventory adjustments.
#[async_trait]
pub trait StockAdjusterPort: Send + Sync {
    /// Decrement `product_id`'s stock by `quantity`; no-op on insufficient
    /// stock. Each call is independent - the caller aggregates outcomes
    /// across an order's items.
    async fn decrement_stock(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), StockError>;
}
