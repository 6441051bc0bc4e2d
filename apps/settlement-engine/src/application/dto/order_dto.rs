//! Order and payment DTOs.

use serde::{Deserialize, Serialize};

/// A line item as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDto {
    /// Product identifier.
    pub product_id: String,
    /// Ordered quantity.
    pub quantity: u32,
    /// Unit price at order time, in the smallest currency unit.
    pub price: i64,
}

/// Input for creating a pending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderDto {
    /// Caller-chosen order number (gateway correlation key).
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
    pub shipping_note: Option<String>,
    /// Line items; must not be empty.
    pub items: Vec<OrderItemDto>,
}

/// Result of creating a pending order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedOrderDto {
    /// Internal id of the new order.
    pub order_id: String,
}

/// Input for confirming a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentDto {
    /// Gateway payment key from the storefront client.
    pub payment_key: String,
    /// Order number the payment settles.
    pub order_number: String,
    /// Amount the caller believes it is settling.
    pub amount: i64,
}

/// Input for cancelling a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelPaymentDto {
    /// Payment to cancel.
    pub payment_key: String,
    /// Reason forwarded to the processor.
    pub cancel_reason: String,
    /// Partial cancel amount; full cancellation when absent.
    pub cancel_amount: Option<i64>,
}
