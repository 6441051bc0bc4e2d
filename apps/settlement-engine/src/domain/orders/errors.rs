//! Order settlement errors.

use std::fmt;

use super::value_objects::OrderStatus;
use crate::domain::shared::{DomainError, Money};

/// Errors that can occur in the order lifecycle and its persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Invalid state transition attempted.
    InvalidStateTransition {
        /// Current order status.
        from: OrderStatus,
        /// Attempted status.
        to: OrderStatus,
    },

    /// Creation input failed validation.
    Validation(DomainError),

    /// An order must carry at least one line item.
    EmptyItems,

    /// Declared total does not match the sum of the line items.
    TotalMismatch {
        /// Total declared by the caller.
        declared: Money,
        /// Sum of quantity x unit price across items.
        computed: Money,
    },

    /// Order not found.
    NotFound {
        /// Order number that was looked up.
        order_number: String,
    },

    /// An order with this number already exists.
    DuplicateOrderNumber {
        /// The conflicting order number.
        order_number: String,
    },

    /// Underlying store failure.
    Storage {
        /// Error details from the store.
        message: String,
    },
}

impl OrderError {
    /// Storage-failure constructor.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStateTransition { from, to } => {
                write!(f, "Invalid order state transition: {from} -> {to}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmptyItems => write!(f, "Order has no line items"),
            Self::TotalMismatch { declared, computed } => {
                write!(
                    f,
                    "Declared total {declared} does not match item sum {computed}"
                )
            }
            Self::NotFound { order_number } => {
                write!(f, "Order not found: {order_number}")
            }
            Self::DuplicateOrderNumber { order_number } => {
                write!(f, "Duplicate order number: {order_number}")
            }
            Self::Storage { message } => write!(f, "Order store failure: {message}"),
        }
    }
}

impl std::error::Error for OrderError {}

impl From<DomainError> for OrderError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}
