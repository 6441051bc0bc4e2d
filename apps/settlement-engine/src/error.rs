//! Rich error handling for the settlement engine.
//!
//! One error type crosses the application boundary, carrying a stable code,
//! a human-readable message, and key/value context for operator lookup.
//!
//! # HTTP Status Codes
//!
//! | Code | HTTP | Usage |
//! |------|------|-------|
//! | `INVALID_REQUEST` | 400 | Malformed caller input |
//! | `ORDER_NOT_FOUND` | 404 | Unknown order number |
//! | `AMOUNT_MISMATCH` | 422 | Caller amount != stored total |
//! | `ALREADY_CONFIRMED` | 409 | Duplicate confirmation replay |
//! | `INVALID_ORDER_STATE` | 409 | Order not pending |
//! | `GATEWAY_REJECTED` | 422 | Processor 4xx, surfaced verbatim |
//! | `GATEWAY_UNAVAILABLE` | 503 | Transport/5xx after retries |
//! | `RESPONSE_INTEGRITY` | 502 | Gateway echo mismatch |
//! | `RECONCILIATION_REQUIRED` | 500 | Charge settled, store transition lost |
//! | `STORAGE` | 500 | Order store failure |

use std::collections::HashMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::ports::GatewayError;
use crate::domain::orders::errors::OrderError;

/// Error codes for the settlement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid request format or missing fields.
    InvalidRequest,
    /// Referenced order number does not exist.
    OrderNotFound,
    /// Caller-supplied amount differs from the stored order total.
    AmountMismatch,
    /// The order already carries a settled payment.
    AlreadyConfirmed,
    /// The order is not in a confirmable state.
    InvalidOrderState,
    /// The processor rejected the request (4xx).
    GatewayRejected,
    /// The processor was unreachable after retries.
    GatewayUnavailable,
    /// The processor's response did not match the request.
    ResponseIntegrity,
    /// The charge settled but the store transition did not apply; manual
    /// reconciliation is required.
    ReconciliationRequired,
    /// Order store failure.
    Storage,
}

impl ErrorCode {
    /// Get the HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest => StatusCode::BAD_REQUEST,
            Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::AmountMismatch | Self::GatewayRejected => StatusCode::UNPROCESSABLE_ENTITY,
            Self::AlreadyConfirmed | Self::InvalidOrderState => StatusCode::CONFLICT,
            Self::GatewayUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ResponseIntegrity => StatusCode::BAD_GATEWAY,
            Self::ReconciliationRequired | Self::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the stable error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::AmountMismatch => "AMOUNT_MISMATCH",
            Self::AlreadyConfirmed => "ALREADY_CONFIRMED",
            Self::InvalidOrderState => "INVALID_ORDER_STATE",
            Self::GatewayRejected => "GATEWAY_REJECTED",
            Self::GatewayUnavailable => "GATEWAY_UNAVAILABLE",
            Self::ResponseIntegrity => "RESPONSE_INTEGRITY",
            Self::ReconciliationRequired => "RECONCILIATION_REQUIRED",
            Self::Storage => "STORAGE",
        }
    }

    /// Whether the caller may safely retry the whole operation.
    ///
    /// Only true when no order mutation can have happened.
    #[must_use]
    pub const fn caller_may_retry(&self) -> bool {
        matches!(self, Self::GatewayUnavailable)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A settlement error with context.
#[derive(Debug, Error)]
pub struct SettlementError {
    /// Error code.
    code: ErrorCode,
    /// Human-readable message.
    message: String,
    /// Additional context (key-value pairs).
    context: Vec<(String, String)>,
}

impl SettlementError {
    /// Create a new settlement error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Look up one context value.
    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Convert to an HTTP-compatible error response body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

impl std::fmt::Display for SettlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// HTTP-compatible error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Error code string.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional details.
    pub details: HashMap<String, String>,
}

/// Convenience constructors for common errors.
impl SettlementError {
    /// Invalid request input.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Unknown order number.
    #[must_use]
    pub fn order_not_found(order_number: &str) -> Self {
        Self::new(ErrorCode::OrderNotFound, "Invalid order number")
            .with_context("order_number", order_number)
    }

    /// Caller amount differs from stored order total.
    #[must_use]
    pub fn amount_mismatch(order_number: &str, stored: i64, requested: i64) -> Self {
        Self::new(
            ErrorCode::AmountMismatch,
            "Payment amount does not match the order total",
        )
        .with_context("order_number", order_number)
        .with_context("stored_amount", stored.to_string())
        .with_context("requested_amount", requested.to_string())
    }

    /// Replay of an already confirmed order.
    #[must_use]
    pub fn already_confirmed(order_number: &str) -> Self {
        Self::new(ErrorCode::AlreadyConfirmed, "Order is already confirmed")
            .with_context("order_number", order_number)
    }

    /// Order not in a confirmable state.
    #[must_use]
    pub fn invalid_order_state(order_number: &str, status: &str) -> Self {
        Self::new(
            ErrorCode::InvalidOrderState,
            "Order is not in a confirmable state",
        )
        .with_context("order_number", order_number)
        .with_context("status", status)
    }

    /// Gateway response fields did not match the request.
    #[must_use]
    pub fn response_integrity(message: impl Into<String>, order_number: &str) -> Self {
        Self::new(ErrorCode::ResponseIntegrity, message).with_context("order_number", order_number)
    }

    /// The gateway settled the charge but the guarded store transition did
    /// not apply. Never retried automatically; the payment key is carried
    /// for out-of-band lookup.
    #[must_use]
    pub fn reconciliation_required(order_number: &str, payment_key: &str) -> Self {
        Self::new(
            ErrorCode::ReconciliationRequired,
            "Payment was settled but the order could not be updated. \
             Contact support instead of retrying.",
        )
        .with_context("order_number", order_number)
        .with_context("payment_key", payment_key)
    }

    /// Order store failure.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Storage, message)
    }
}

impl From<GatewayError> for SettlementError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected {
                status,
                code,
                message,
            } => {
                let mut error = Self::new(
                    ErrorCode::GatewayRejected,
                    format!("Payment confirmation failed: {message}"),
                )
                .with_context("gateway_status", status.to_string());
                if let Some(code) = code {
                    error = error.with_context("gateway_code", code);
                }
                error
            }
            GatewayError::RetriesExhausted { attempts } => Self::new(
                ErrorCode::GatewayUnavailable,
                "Payment gateway is temporarily unavailable; please try again",
            )
            .with_context("attempts", attempts.to_string()),
            GatewayError::InvalidResponse { message } => {
                Self::new(ErrorCode::ResponseIntegrity, message)
            }
        }
    }
}

impl From<OrderError> for SettlementError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(_)
            | OrderError::EmptyItems
            | OrderError::TotalMismatch { .. }
            | OrderError::DuplicateOrderNumber { .. } => Self::invalid_request(err.to_string()),
            OrderError::NotFound { ref order_number } => Self::order_not_found(order_number),
            OrderError::InvalidStateTransition { .. } | OrderError::Storage { .. } => {
                Self::storage(err.to_string())
            }
        }
    }
}
