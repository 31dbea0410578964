//! Room membership for all connections.

use dashmap::DashMap;

use kiosk_core::types::id::ConnectionId;

use super::Audience;
use super::room::Room;

/// Tracks which room each connection is in.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: DashMap<Audience, Room>,
    membership: DashMap<ConnectionId, Audience>,
}

impl RoomRegistry {
    /// Create a registry with both rooms empty.
    pub fn new() -> Self {
        let rooms = DashMap::new();
        rooms.insert(Audience::Public, Room::new(Audience::Public));
        rooms.insert(Audience::Admin, Room::new(Audience::Admin));
        Self {
            rooms,
            membership: DashMap::new(),
        }
    }

    /// Put a connection in `audience`, leaving whatever room it was in.
    /// Returns the previous room.
    pub fn join(&self, conn_id: ConnectionId, audience: Audience) -> Option<Audience> {
        let previous = self.membership.insert(conn_id, audience);
        if let Some(prev) = previous
            && prev != audience
            && let Some(mut room) = self.rooms.get_mut(&prev)
        {
            room.leave(conn_id);
        }
        self.rooms
            .entry(audience)
            .or_insert_with(|| Room::new(audience))
            .join(conn_id);
        previous
    }

    /// Drop a connection from its room.
    pub fn leave(&self, conn_id: ConnectionId) -> Option<Audience> {
        let (_, audience) = self.membership.remove(&conn_id)?;
        if let Some(mut room) = self.rooms.get_mut(&audience) {
            room.leave(conn_id);
        }
        Some(audience)
    }

    /// The room a connection is in.
    pub fn audience_of(&self, conn_id: ConnectionId) -> Option<Audience> {
        self.membership.get(&conn_id).map(|entry| *entry.value())
    }

    /// Members of a room.
    pub fn members(&self, audience: Audience) -> Vec<ConnectionId> {
        self.rooms
            .get(&audience)
            .map(|room| room.members())
            .unwrap_or_default()
    }

    /// Member count of a room.
    pub fn member_count(&self, audience: Audience) -> usize {
        self.rooms.get(&audience).map_or(0, |room| room.len())
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
