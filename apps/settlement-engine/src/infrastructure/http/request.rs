//! HTTP request DTOs.
//!
//! Wire fields are camelCase to match the storefront clients and the
//! gateway's own contract.

use serde::{Deserialize, Serialize};

/// A line item in an order creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    /// Product identifier.
    pub product_id: String,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price at order time.
    pub price: i64,
}

/// Request to create a pending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Caller-chosen order number.
    pub order_number: String,
    /// Declared total amount.
    pub total_amount: i64,
    /// Customer name.
    pub customer_name: String,
    /// Customer phone.
    pub customer_phone: String,
    /// Customer email.
    pub customer_email: String,
    /// Shipping address.
    pub shipping_address: String,
    /// Shipping postcode.
    pub shipping_postcode: String,
    /// Optional delivery note.
    #[serde(default)]
    pub shipping_note: Option<String>,
    /// Line items.
    pub items: Vec<OrderItemRequest>,
}

/// Request to confirm a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    /// Gateway payment key.
    pub payment_key: String,
    /// Order number (the gateway's `orderId`).
    pub order_id: String,
    /// Amount to settle.
    pub amount: i64,
}

/// Request to cancel a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelPaymentRequest {
    /// Payment to cancel.
    pub payment_key: String,
    /// Reason forwarded to the processor.
    pub cancel_reason: String,
    /// Partial cancel amount; full cancellation when absent.
    #[serde(default)]
    pub cancel_amount: Option<i64>,
}
