use super::coordinator::CoordinatorHandle;
use super::messages::ClientMessage;
use super::registry::ConnectionId;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Run a WebSocket connection against the coordinator.
/// Splits the socket, spawns the writer and reader halves, and deregisters
/// the connection once either side finishes.
pub async fn run_connection(
    socket: WebSocket,
    remote: SocketAddr,
    coordinator: CoordinatorHandle,
    outbox_capacity: usize,
) {
    let id = ConnectionId::new();
    let (mut sender, receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Arc<str>>(outbox_capacity);

    let Some(slot) = coordinator.connect(id, tx).await else {
        warn!(%remote, "Coordinator unavailable, closing connection");
        return;
    };
    info!(%id, %remote, slot, "WebSocket connection opened");

    // Task to drain the outbox into the socket
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.to_string())).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(receive_loop(receiver, id, slot, coordinator.clone()));

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    coordinator.disconnect(id);
    info!(%id, %remote, slot, "WebSocket connection closed");
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    id: ConnectionId,
    slot: usize,
    coordinator: CoordinatorHandle,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(err) => {
                warn!(%id, slot, %err, "WebSocket error");
                break;
            }
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => {
                debug!("Received non-text message, ignoring");
                continue;
            }
        };

        let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) else {
            warn!(slot, raw = %text, "Failed to parse client message");
            continue;
        };

        debug!(slot, ?client_msg, "Received message");
        coordinator.submit(id, client_msg);
    }
}
