//! Toss Payments wire types.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/payments/confirm`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TossConfirmRequest {
    /// Payment key handed to the storefront client by the widget.
    pub payment_key: String,
    /// Order number used as the correlation id.
    pub order_id: String,
    /// Amount to settle, in the smallest currency unit.
    pub amount: i64,
}

/// Body of `POST /v1/payments/{paymentKey}/cancel`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TossCancelRequest {
    /// Reason forwarded to the processor.
    pub cancel_reason: String,
    /// Partial cancel amount; omitted for a full cancellation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_amount: Option<i64>,
}

/// Payment payload returned on success (confirm and query).
///
/// Only the fields the settlement path validates are modeled; the full
/// payload is carried separately as raw JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TossPaymentResponse {
    /// Payment key.
    pub payment_key: String,
    /// Order number echoed back.
    pub order_id: String,
    /// Payment status (`DONE` once settled).
    pub status: String,
    /// Settled amount.
    pub total_amount: i64,
    /// Settlement method; absent until the payment settles.
    #[serde(default)]
    pub method: Option<String>,
    /// RFC 3339 approval timestamp; absent until the payment settles.
    #[serde(default)]
    pub approved_at: Option<String>,
}

/// Error payload returned with a non-2xx status.
#[derive(Debug, Clone, Deserialize)]
pub struct TossErrorResponse {
    /// Processor error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Processor error message.
    pub message: String,
}
