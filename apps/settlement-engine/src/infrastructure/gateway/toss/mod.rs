//! Toss Payments gateway adapter.
//!
//! Implements `PaymentGatewayPort` against the Toss Payments REST API.

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;

pub use adapter::TossGatewayAdapter;
pub use api_types::{TossCancelRequest, TossConfirmRequest, TossErrorResponse, TossPaymentResponse};
pub use config::TossConfig;
pub use error::TossError;
pub use http_client::TossHttpClient;
