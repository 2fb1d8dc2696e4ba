use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

/// Serialized frames queued for a single client
pub type Outbox = mpsc::Sender<Arc<str>>;

/// Opaque identity of one transport session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

pub struct Connection {
    pub id: ConnectionId,
    pub slot: usize,
    pub outbox: Outbox,
}

/// Live connections in connect order, each holding the player slot it was
/// given on arrival.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Vec<Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns its slot.
    ///
    /// The slot is the number of connections alive right now. After an
    /// earlier disconnect that number may still be held by a live
    /// connection, in which case the next free slot above it is used.
    pub fn connect(&mut self, id: ConnectionId, outbox: Outbox) -> usize {
        let mut slot = self.connections.len();
        while self.connections.iter().any(|c| c.slot == slot) {
            slot += 1;
        }

        debug!(%id, slot, "Registering connection");
        self.connections.push(Connection { id, slot, outbox });
        slot
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> Option<usize> {
        let index = self.connections.iter().position(|c| c.id == id)?;
        let connection = self.connections.remove(index);
        debug!(%id, slot = connection.slot, "Removed connection");
        Some(connection.slot)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn slot_of(&self, id: ConnectionId) -> Option<usize> {
        self.get(id).map(|c| c.slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
