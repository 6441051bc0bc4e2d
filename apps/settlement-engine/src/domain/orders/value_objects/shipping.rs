//! Shipping destination captured with an order.

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Delivery address for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    address: String,
    postcode: String,
    note: String,
}

impl ShippingDetails {
    /// Create validated shipping details. The delivery note is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if the address or postcode is empty.
    pub fn new(
        address: impl Into<String>,
        postcode: impl Into<String>,
        note: Option<String>,
    ) -> Result<Self, DomainError> {
        let address = address.into();
        let postcode = postcode.into();

        if address.trim().is_empty() {
            return Err(DomainError::missing_field("shipping_address"));
        }
        if postcode.trim().is_empty() {
            return Err(DomainError::missing_field("shipping_postcode"));
        }

        Ok(Self {
            address,
            postcode,
            note: note.unwrap_or_default(),
        })
    }

    /// Street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Postal code.
    #[must_use]
    pub fn postcode(&self) -> &str {
        &self.postcode
    }

    /// Delivery note (empty when the customer left none).
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }
}
