//! Single owner of the shared game state.
//!
//! Every connect, disconnect and client command funnels through one queue
//! into [`Coordinator::run`]. Each event is handled to completion, including
//! queuing its outbound frames, before the next is dequeued, so the state
//! needs no locking even though sockets are served from many tasks.

use super::broadcast::{broadcast, send_private};
use super::messages::{ClientMessage, ServerMessage};
use super::registry::{ConnectionId, ConnectionRegistry, Outbox};
use super::state::{GameState, TokenPosition};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Events fed to the coordinator by connection tasks
pub enum CoordinatorEvent {
    Connected {
        id: ConnectionId,
        outbox: Outbox,
        reply: oneshot::Sender<usize>,
    },
    Command {
        id: ConnectionId,
        msg: ClientMessage,
    },
    Disconnected {
        id: ConnectionId,
    },
}

#[derive(Default)]
pub struct Coordinator {
    state: GameState,
    registry: ConnectionRegistry,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<CoordinatorEvent>) {
        info!("Coordinator started");
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        info!("Coordinator stopped");
    }

    pub fn handle_event(&mut self, event: CoordinatorEvent) {
        match event {
            CoordinatorEvent::Connected { id, outbox, reply } => {
                let slot = self.connect(id, outbox);
                let _ = reply.send(slot);
            }
            CoordinatorEvent::Command { id, msg } => self.handle_command(id, msg),
            CoordinatorEvent::Disconnected { id } => self.disconnect(id),
        }
    }

    /// Registers the connection and sends it a private snapshot of the game.
    pub fn connect(&mut self, id: ConnectionId, outbox: Outbox) -> usize {
        let slot = self.registry.connect(id, outbox);
        info!(%id, slot, total = self.registry.len(), "Player connected");

        if let Some(connection) = self.registry.get(id) {
            send_private(
                connection,
                &ServerMessage::GameState {
                    game_state: self.state.clone(),
                    your_player_index: slot,
                },
            );
        }
        slot
    }

    pub fn disconnect(&mut self, id: ConnectionId) {
        let Some(slot) = self.registry.disconnect(id) else {
            return;
        };
        info!(%id, slot, total = self.registry.len(), "Player disconnected");
    }

    pub fn handle_command(&mut self, id: ConnectionId, msg: ClientMessage) {
        let Some(slot) = self.registry.slot_of(id) else {
            warn!(%id, ?msg, "Command from unregistered connection");
            return;
        };
        debug!(slot, ?msg, "Handling command");

        match msg {
            ClientMessage::PlayerSelected { token } => self.select_token(slot, &token),
            ClientMessage::StartGame => self.start_game(slot),
            ClientMessage::DiceRolled { result } => self.roll_dice(slot, result),
            ClientMessage::TokenMoved {
                token_name,
                space,
                x,
                y,
                z,
            } => self.move_token(token_name, TokenPosition { space, x, y, z }),
            ClientMessage::NextTurn => self.next_turn(slot),
            ClientMessage::Reset => self.reset(slot),
        }
    }

    fn select_token(&mut self, slot: usize, token: &str) {
        let selected_players = match self.state.toggle_token(token) {
            Ok(selected) => selected.to_vec(),
            Err(reason) => {
                warn!(slot, token, ?reason, "Ignoring token selection");
                return;
            }
        };
        broadcast(&self.registry, &ServerMessage::PlayersUpdated { selected_players });
    }

    /// Each recipient gets the same state plus its own slot, so this is a
    /// round of private sends rather than a broadcast.
    fn start_game(&mut self, slot: usize) {
        self.state.start();
        info!(
            slot,
            players = self.state.player_count(),
            "Game started"
        );

        for connection in self.registry.iter() {
            send_private(
                connection,
                &ServerMessage::GameStarted {
                    game_state: self.state.clone(),
                    your_player_index: connection.slot,
                },
            );
        }
    }

    fn roll_dice(&mut self, slot: usize, result: u8) {
        if let Err(reason) = self.state.record_roll(slot, result) {
            warn!(slot, result, ?reason, "Invalid dice roll");
            return;
        }
        info!(slot, result, "Dice rolled");
        broadcast(
            &self.registry,
            &ServerMessage::DiceRolled {
                result,
                roller_index: slot,
            },
        );
    }

    fn move_token(&mut self, token_name: String, position: TokenPosition) {
        self.state.move_token(&token_name, position.clone());
        broadcast(
            &self.registry,
            &ServerMessage::TokenMoved {
                token_name,
                space: position.space,
                x: position.x,
                y: position.y,
                z: position.z,
            },
        );
    }

    fn next_turn(&mut self, slot: usize) {
        let current_player_index = match self.state.advance_turn() {
            Ok(index) => index,
            Err(reason) => {
                warn!(slot, ?reason, "Ignoring turn advance");
                return;
            }
        };
        info!(slot, current_player_index, "Turn changed");
        broadcast(
            &self.registry,
            &ServerMessage::TurnChanged {
                current_player_index,
            },
        );
    }

    fn reset(&mut self, slot: usize) {
        self.state.reset();
        info!(slot, "Game reset");
        broadcast(&self.registry, &ServerMessage::GameReset);
    }
}

/// Cheap, cloneable sender side of the coordinator queue
#[derive(Clone)]
pub struct CoordinatorHandle {
    events: mpsc::UnboundedSender<CoordinatorEvent>,
}

impl CoordinatorHandle {
    /// Starts a coordinator with fresh state on the current runtime.
    pub fn spawn() -> Self {
        let (events, rx) = mpsc::unbounded_channel();
        tokio::spawn(Coordinator::new().run(rx));
        Self { events }
    }

    /// Registers a connection and waits for its slot.
    pub async fn connect(&self, id: ConnectionId, outbox: Outbox) -> Option<usize> {
        let (reply, slot) = oneshot::channel();
        self.events
            .send(CoordinatorEvent::Connected { id, outbox, reply })
            .ok()?;
        slot.await.ok()
    }

    pub fn submit(&self, id: ConnectionId, msg: ClientMessage) {
        if self
            .events
            .send(CoordinatorEvent::Command { id, msg })
            .is_err()
        {
            warn!(%id, "Coordinator is gone, dropping command");
        }
    }

    pub fn disconnect(&self, id: ConnectionId) {
        let _ = self.events.send(CoordinatorEvent::Disconnected { id });
    }
}
