//! Players taking part in a game

use serde::{Deserialize, Serialize};

use crate::grid::Token;

/// Who or what decides a player's moves
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerKind {
    Human,
    /// Plays a uniformly random open column
    Random,
    /// Plays the column chosen by minimax search
    Minimax { search_depth: usize },
}

impl PlayerKind {
    pub fn is_automated(&self) -> bool {
        !matches!(self, PlayerKind::Human)
    }
}

/// Construction-time description of a player
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub label: String,
    pub token: Token,
    #[serde(flatten)]
    pub kind: PlayerKind,
}

impl PlayerSpec {
    pub fn human<S: Into<String>>(label: S, token: Token) -> Self {
        Self {
            label: label.into(),
            token,
            kind: PlayerKind::Human,
        }
    }

    pub fn random<S: Into<String>>(label: S, token: Token) -> Self {
        Self {
            label: label.into(),
            token,
            kind: PlayerKind::Random,
        }
    }

    pub fn minimax<S: Into<String>>(label: S, token: Token, search_depth: usize) -> Self {
        Self {
            label: label.into(),
            token,
            kind: PlayerKind::Minimax { search_depth },
        }
    }
}

/// A seated player
///
/// `opponent` is the token automated players score positions against: the
/// token of the next player in turn order.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Player {
    pub label: String,
    pub token: Token,
    pub kind: PlayerKind,
    pub opponent: Token,
}

impl Player {
    /// Seats every spec in order, linking each player to the next one's token
    pub fn seat_all(specs: &[PlayerSpec]) -> Vec<Player> {
        specs
            .iter()
            .enumerate()
            .map(|(i, spec)| Player {
                label: spec.label.clone(),
                token: spec.token,
                kind: spec.kind,
                opponent: specs[(i + 1) % specs.len()].token,
            })
            .collect()
    }
}
