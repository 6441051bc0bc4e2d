//! Payment details recorded when an order is confirmed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::shared::PaymentKey;

/// Settled-payment fields written by the confirmation transition.
///
/// Populated only from a validated gateway response; a pending order has no
/// payment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Gateway payment key.
    pub payment_key: PaymentKey,
    /// Settlement method reported by the gateway (card, transfer, ...).
    pub method: String,
    /// Gateway approval timestamp.
    pub approved_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Create a payment record.
    #[must_use]
    pub fn new(
        payment_key: PaymentKey,
        method: impl Into<String>,
        approved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            payment_key,
            method: method.into(),
            approved_at,
        }
    }
}
