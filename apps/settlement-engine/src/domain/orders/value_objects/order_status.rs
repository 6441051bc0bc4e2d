//! Order status in the settlement lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status.
///
/// An order is created `pending` and transitions at most once, to
/// `confirmed` (payment settled) or `cancelled` (refunded/aborted).
/// Both are terminal; no other transitions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order created, payment not yet settled.
    Pending,
    /// Payment settled by the gateway and recorded.
    Confirmed,
    /// Payment cancelled/refunded.
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Cancelled)
    }

    /// Returns true if the order can still be confirmed.
    #[must_use]
    pub const fn is_confirmable(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Get the storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_is_terminal() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Confirmed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn order_status_is_confirmable() {
        assert!(OrderStatus::Pending.is_confirmable());
        assert!(!OrderStatus::Confirmed.is_confirmable());
        assert!(!OrderStatus::Cancelled.is_confirmable());
    }

    #[test]
    fn order_status_round_trips_storage_form() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("shipped"), None);
    }

    #[test]
    fn order_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");

        let parsed: OrderStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, OrderStatus::Pending);
    }

    #[test]
    fn order_status_display() {
        assert_eq!(format!("{}", OrderStatus::Cancelled), "cancelled");
    }
}
