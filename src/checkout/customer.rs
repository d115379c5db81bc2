//! Customers

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Customer detail validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The email address is not of the form `local@domain`.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),
}

/// Contact and delivery details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerDetails {
    /// First name
    #[serde(default)]
    pub first_name: String,

    /// Last name
    #[serde(default)]
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,

    /// Country
    pub country: String,
}

impl CustomerDetails {
    /// Check the fields needed to deliver an order.
    ///
    /// # Errors
    ///
    /// - [`CustomerError::MissingField`]: email, address, city, postal code or country is blank.
    /// - [`CustomerError::InvalidEmail`]: the email has no local part or no domain.
    pub fn validate(&self) -> Result<(), CustomerError> {
        let required = [
            ("email", &self.email),
            ("address", &self.address),
            ("city", &self.city),
            ("postal code", &self.postal_code),
            ("country", &self.country),
        ];

        if let Some((field, _)) = required
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            return Err(CustomerError::MissingField(field));
        }

        let email = self.email.trim();

        let valid_email = email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        });

        if !valid_email {
            return Err(CustomerError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }

    /// Delivery address on one line: `address, city, postal code, country`.
    pub fn shipping_address(&self) -> String {
        [&self.address, &self.city, &self.postal_code, &self.country]
            .map(|part| part.trim())
            .join(", ")
    }

    /// First and last name separated by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// Who is placing the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerIdentity {
    /// Signed-in user
    Authenticated {
        /// User identifier from the authentication provider
        user_id: Uuid,
    },

    /// Customer without an account
    Guest {
        /// Freshly generated customer identifier
        id: Uuid,

        /// `G-` followed by the first eight characters of `id`
        customer_number: String,
    },
}

impl CustomerIdentity {
    /// Create a guest with a new random identifier.
    #[must_use]
    pub fn guest() -> Self {
        Self::guest_from(Uuid::new_v4())
    }

    /// Create a guest with a known identifier.
    #[must_use]
    pub fn guest_from(id: Uuid) -> Self {
        let simple = id.simple().to_string();
        let prefix = simple.get(..8).unwrap_or(simple.as_str());

        Self::Guest {
            id,
            customer_number: format!("G-{prefix}"),
        }
    }

    /// Authenticated when a user is signed in, otherwise a new guest.
    #[must_use]
    pub fn resolve(user_id: Option<Uuid>) -> Self {
        user_id.map_or_else(Self::guest, |user_id| Self::Authenticated { user_id })
    }

    /// Identifier recorded on the order.
    pub fn customer_id(&self) -> Uuid {
        match self {
            Self::Authenticated { user_id } => *user_id,
            Self::Guest { id, .. } => *id,
        }
    }

    /// Guest customer number, if this is a guest.
    pub fn customer_number(&self) -> Option<&str> {
        match self {
            Self::Authenticated { .. } => None,
            Self::Guest {
                customer_number, ..
            } => Some(customer_number),
        }
    }

    /// Returns true for guests.
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest { .. })
    }
}

/// Customer record written for guests before their order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    /// Customer identifier
    pub id: Uuid,

    /// Guest customer number
    pub customer_number: String,

    /// Contact and delivery details
    pub details: CustomerDetails,
}
