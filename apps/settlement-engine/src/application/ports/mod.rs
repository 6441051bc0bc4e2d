//! Driven ports - interfaces the application depends on.

mod gateway_port;
mod stock_port;

pub use gateway_port::{
    CancelPaymentRequest, ConfirmPaymentRequest, GatewayError, GatewayPayment, PaymentGatewayPort,
};
pub use stock_port::{StockAdjusterPort, StockError};
