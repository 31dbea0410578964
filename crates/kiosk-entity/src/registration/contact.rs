//! Contact details attached to a registration.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// How to reach a party. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Contact {
    /// Phone number for SMS updates.
    pub phone_number: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Whether the party agreed to be contacted by email.
    pub email_consent: bool,
}

impl Contact {
    /// Build a contact from raw form input, dropping blank values.
    pub fn new(phone_number: Option<String>, email: Option<String>, email_consent: bool) -> Self {
        Self {
            phone_number: normalize(phone_number),
            email: normalize(email),
            email_consent,
        }
    }

    /// Returns `true` if neither phone nor email was supplied.
    pub fn is_empty(&self) -> bool {
        self.phone_number.is_none() && self.email.is_none()
    }

    /// Returns `true` if `address` names this contact's phone or email.
    pub fn matches(&self, address: &str) -> bool {
        let address = address.trim();
        !address.is_empty()
            && (self.phone_number.as_deref() == Some(address)
                || self
                    .email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(address)))
    }

    /// Address a text notification can be sent to.
    pub fn sms_target(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
