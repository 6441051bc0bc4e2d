//! Order settlement bounded context.
//!
//! Owns the order aggregate, its status lifecycle, and the persistence
//! abstraction. Gateway and inventory concerns live behind application ports.

/// Order aggregate and line items.
pub mod aggregate;

/// Domain errors for order settlement.
pub mod errors;

/// Persistence abstraction (implemented by infrastructure adapters).
pub mod repository;

/// Value objects for the order context.
pub mod value_objects;
