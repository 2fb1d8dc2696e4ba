use super::state::GameState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    PlayerSelected {
        token: String,
    },
    StartGame,
    DiceRolled {
        result: u8,
    },
    TokenMoved {
        token_name: String,
        space: u32,
        x: f64,
        y: f64,
        z: f64,
    },
    NextTurn,
    Reset,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    // Private to a single connection
    GameState {
        game_state: GameState,
        your_player_index: usize,
    },
    GameStarted {
        game_state: GameState,
        your_player_index: usize,
    },

    // Broadcast
    PlayersUpdated {
        selected_players: Vec<String>,
    },
    DiceRolled {
        result: u8,
        roller_index: usize,
    },
    TokenMoved {
        token_name: String,
        space: u32,
        x: f64,
        y: f64,
        z: f64,
    },
    TurnChanged {
        current_player_index: usize,
    },
    GameReset,
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::GameState { .. } => "gameState",
            ServerMessage::GameStarted { .. } => "gameStarted",
            ServerMessage::PlayersUpdated { .. } => "playersUpdated",
            ServerMessage::DiceRolled { .. } => "diceRolled",
            ServerMessage::TokenMoved { .. } => "tokenMoved",
            ServerMessage::TurnChanged { .. } => "turnChanged",
            ServerMessage::GameReset => "gameReset",
        }
    }
}
