//! Persistence adapters.

mod in_memory;

/// SQLite adapters backed by sqlx.
pub mod sqlite;

pub use in_memory::{InMemoryOrderRepository, InMemoryStockAdjuster};
