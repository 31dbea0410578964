//! A single audience room.

use std::collections::HashSet;

use kiosk_core::types::id::ConnectionId;

use super::Audience;

/// Set of connections receiving one audience's broadcasts.
#[derive(Debug, Clone)]
pub struct Room {
    /// Audience served.
    pub audience: Audience,
    members: HashSet<ConnectionId>,
}

impl Room {
    /// Create an empty room.
    pub fn new(audience: Audience) -> Self {
        Self {
            audience,
            members: HashSet::new(),
        }
    }

    /// Add a member.
    pub fn join(&mut self, conn_id: ConnectionId) {
        self.members.insert(conn_id);
    }

    /// Remove a member.
    pub fn leave(&mut self, conn_id: ConnectionId) {
        self.members.remove(&conn_id);
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the room has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member connection ids.
    pub fn members(&self) -> Vec<ConnectionId> {
        self.members.iter().copied().collect()
    }
}
