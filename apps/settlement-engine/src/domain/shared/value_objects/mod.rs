//! Shared value objects.

mod identifiers;
mod money;

pub use identifiers::{OrderNumber, OrderRecordId, PaymentKey, ProductId};
pub use money::Money;
