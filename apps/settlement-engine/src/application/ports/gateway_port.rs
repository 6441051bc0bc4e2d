//! Payment Gateway Port (Driven Port)
//!
//! Interface for the external payment processor. The adapter owns transport
//! concerns (authentication, timeout, retry); callers see only typed
//! payloads and a classified failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, OrderNumber, PaymentKey};

/// Request to confirm (settle) a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentRequest {
    /// Gateway payment key handed to the storefront client.
    pub payment_key: PaymentKey,
    /// Order number used as the gateway correlation id.
    pub order_number: OrderNumber,
    /// Amount the caller believes it is settling.
    pub amount: Money,
}

/// Request to cancel a settled payment, optionally partially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelPaymentRequest {
    /// Payment to cancel.
    pub payment_key: PaymentKey,
    /// Reason forwarded to the processor.
    pub cancel_reason: String,
    /// Partial cancel amount; full cancellation when absent.
    pub cancel_amount: Option<Money>,
}

/// A payment payload returned by the gateway (confirm or query).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayPayment {
    /// Gateway payment key.
    pub payment_key: PaymentKey,
    /// Order number echoed by the gateway.
    pub order_number: OrderNumber,
    /// Gateway-side payment status (`"DONE"` once settled).
    pub status: String,
    /// Amount the gateway settled.
    pub total_amount: Money,
    /// Settlement method (card, transfer, ...).
    pub method: String,
    /// Approval timestamp.
    pub approved_at: Option<DateTime<Utc>>,
    /// Full processor payload, passed through to callers.
    pub raw: serde_json::Value,
}

impl GatewayPayment {
    /// Gateway status value that marks a settled payment.
    pub const STATUS_DONE: &'static str = "DONE";

    /// Returns true if the gateway reports the payment as settled.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == Self::STATUS_DONE
    }
}

/// Payment gateway port error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GatewayError {
    /// The processor answered with a client error (HTTP 4xx). Never
    /// retried; retrying cannot fix a bad request or invalid key.
    #[error("Payment gateway rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status returned by the gateway.
        status: u16,
        /// Processor error code, when the body carried one.
        code: Option<String>,
        /// Processor error message.
        message: String,
    },

    /// Transport failures or HTTP 5xx persisted through every allowed
    /// attempt. Distinct from [`GatewayError::Rejected`] so callers can
    /// tell "gateway said no" from "gateway was unreachable".
    #[error("Payment gateway unreachable after {attempts} attempts")]
    RetriesExhausted {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// The gateway answered 2xx but the body could not be understood.
    #[error("Malformed gateway response: {message}")]
    InvalidResponse {
        /// Parse failure details.
        message: String,
    },
}

/// Port for payment processor interactions.
#[async_trait]
pub trait PaymentGatewayPort: Send + Sync {
    /// Confirm (settle) a payment.
    async fn confirm_payment(
        &self,
        request: &ConfirmPaymentRequest,
    ) -> Result<GatewayPayment, GatewayError>;

    /// Query a payment by its key.
    async fn get_payment(&self, payment_key: &PaymentKey) -> Result<GatewayPayment, GatewayError>;

    /// Cancel a settled payment. The response body is processor-defined.
    async fn cancel_payment(
        &self,
        request: &CancelPaymentRequest,
    ) -> Result<serde_json::Value, GatewayError>;
}
