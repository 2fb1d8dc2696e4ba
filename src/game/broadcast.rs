use super::messages::ServerMessage;
use super::registry::{Connection, ConnectionRegistry};
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

fn encode(msg: &ServerMessage) -> Option<Arc<str>> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(json.into()),
        Err(err) => {
            warn!(kind = msg.kind(), %err, "Failed to serialize server message");
            None
        }
    }
}

/// Queues a frame without waiting. Closed or backed-up clients are skipped.
fn deliver(connection: &Connection, frame: Arc<str>) -> bool {
    match connection.outbox.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Closed(_)) => {
            debug!(id = %connection.id, slot = connection.slot, "Skipping closed connection");
            false
        }
        Err(TrySendError::Full(_)) => {
            warn!(id = %connection.id, slot = connection.slot, "Outbox full, dropping message");
            false
        }
    }
}

/// Sends one event to every tracked connection. Returns how many accepted it.
pub fn broadcast(registry: &ConnectionRegistry, msg: &ServerMessage) -> usize {
    let Some(frame) = encode(msg) else {
        return 0;
    };

    let delivered = registry
        .iter()
        .filter(|connection| deliver(connection, frame.clone()))
        .count();

    debug!(
        kind = msg.kind(),
        delivered,
        tracked = registry.len(),
        "Broadcast"
    );
    delivered
}

/// Sends a message to a single connection, bypassing the broadcast fan-out.
pub fn send_private(connection: &Connection, msg: &ServerMessage) -> bool {
    let Some(frame) = encode(msg) else {
        return false;
    };
    deliver(connection, frame)
}
