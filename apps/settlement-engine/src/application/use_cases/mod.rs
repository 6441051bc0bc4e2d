//! Settlement use cases.

mod cancel_payment;
mod confirm_payment;
mod create_order;
mod lookup_payment;

pub use cancel_payment::CancelPaymentUseCase;
pub use confirm_payment::ConfirmPaymentUseCase;
pub use create_order::CreatePendingOrderUseCase;
pub use lookup_payment::LookupPaymentUseCase;
