use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A player seat fixed at game start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub token: String,
    #[serde(rename = "currentSpace")]
    pub board_position: u32,
}

/// Last reported placement of a token on the board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPosition {
    pub space: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Why a command was dropped. Never sent to clients, only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    AlreadyStarted,
    NotYourTurn { current_turn: usize },
    DieOutOfRange,
    NoPlayers,
}

/// The authoritative game record shared by every connection (pure logic, no I/O)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    #[serde(rename = "selectedPlayers")]
    pub selected_tokens: Vec<String>,
    #[serde(rename = "gameStarted")]
    pub started: bool,
    #[serde(rename = "currentPlayerIndex")]
    pub current_turn: usize,
    pub token_positions: BTreeMap<String, TokenPosition>,
    #[serde(rename = "diceResult")]
    pub last_dice_result: Option<u8>,
    pub players: Vec<Player>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Adds the token if absent, removes it if present.
    pub fn toggle_token(&mut self, token: &str) -> Result<&[String], Rejection> {
        if self.started {
            return Err(Rejection::AlreadyStarted);
        }

        match self.selected_tokens.iter().position(|t| t == token) {
            Some(index) => {
                self.selected_tokens.remove(index);
            }
            None => self.selected_tokens.push(token.to_string()),
        }
        Ok(&self.selected_tokens)
    }

    /// Seats one player per selected token, in selection order. Calling it
    /// again simply rebuilds the same seating.
    pub fn start(&mut self) {
        self.started = true;
        self.current_turn = 0;
        self.players = self
            .selected_tokens
            .iter()
            .map(|token| Player {
                token: token.clone(),
                board_position: 0,
            })
            .collect();
    }

    pub fn record_roll(&mut self, roller_slot: usize, result: u8) -> Result<u8, Rejection> {
        if roller_slot != self.current_turn {
            return Err(Rejection::NotYourTurn {
                current_turn: self.current_turn,
            });
        }
        if !(1..=6).contains(&result) {
            return Err(Rejection::DieOutOfRange);
        }

        self.last_dice_result = Some(result);
        Ok(result)
    }

    pub fn move_token(&mut self, token: &str, position: TokenPosition) {
        self.token_positions.insert(token.to_string(), position);
    }

    /// Passes the turn to the next seat, wrapping around.
    pub fn advance_turn(&mut self) -> Result<usize, Rejection> {
        let count = self.player_count();
        if count == 0 {
            return Err(Rejection::NoPlayers);
        }

        self.current_turn = (self.current_turn + 1) % count;
        Ok(self.current_turn)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
