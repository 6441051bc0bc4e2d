//! Customer contact details captured with an order.

use serde::{Deserialize, Serialize};

use crate::domain::shared::DomainError;

/// Contact details of the ordering customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    name: String,
    phone: String,
    email: String,
}

impl CustomerDetails {
    /// Create validated customer details.
    ///
    /// # Errors
    ///
    /// Returns an error if any field is empty or the email is malformed.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let phone = phone.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(DomainError::missing_field("customer_name"));
        }
        if phone.trim().is_empty() {
            return Err(DomainError::missing_field("customer_phone"));
        }
        if !is_plausible_email(&email) {
            return Err(DomainError::invalid_value(
                "customer_email",
                "not a well-formed email address",
            ));
        }

        Ok(Self { name, phone, email })
    }

    /// Customer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Customer phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Customer email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Minimal structural check: one `@` with a dotted, non-empty domain.
fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .split_once('.')
        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}
