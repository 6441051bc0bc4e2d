//! Shared kernel for the domain layer.

mod errors;
mod value_objects;

pub use errors::DomainError;
pub use value_objects::{Money, OrderNumber, OrderRecordId, PaymentKey, ProductId};
