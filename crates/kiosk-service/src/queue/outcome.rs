//! Inputs and results of queue operations.

use serde::{Deserialize, Serialize};

use kiosk_entity::{Contact, Registration};

/// A party asking to join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// Display name, required.
    pub name: String,
    /// Contact details.
    pub contact: Contact,
    /// Number of adjacent lines needed.
    pub party_size: u32,
    /// Preferred line for a single party.
    pub requested_line: Option<u32>,
}

impl JoinRequest {
    /// A single party with no contact details and no line preference.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: Contact::default(),
            party_size: 1,
            requested_line: None,
        }
    }

    /// Same request with a different party size.
    pub fn with_party_size(mut self, party_size: u32) -> Self {
        self.party_size = party_size;
        self
    }

    /// Same request with a preferred line.
    pub fn on_line(mut self, line: u32) -> Self {
        self.requested_line = Some(line);
        self
    }

    /// Same request with contact details.
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contact = contact;
        self
    }
}

/// A committed join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    /// The stored registration.
    pub registration: Registration,
    /// Estimated wait for the placed cell, in minutes.
    pub wait_minutes: u32,
}
