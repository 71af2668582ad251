//! Game configuration

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::Token;
use crate::player::PlayerSpec;
use crate::{DEFAULT_COLUMNS, DEFAULT_DELAY_MS, DEFAULT_ROWS, DEFAULT_SEARCH_DEPTH, DEFAULT_WIN_LENGTH};

/// Largest supported grid side
pub const MAX_DIMENSION: usize = 64;

/// Everything needed to start a game
///
/// ```toml
/// rows = 6
/// columns = 7
/// win_length = 4
/// automated_delay_ms = 1000
///
/// [[players]]
/// label = "You"
/// token = 1
/// kind = "human"
///
/// [[players]]
/// label = "Computer"
/// token = 2
/// kind = "minimax"
/// search_depth = 3
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub columns: usize,
    pub win_length: usize,
    /// Players in turn order, the first one moves first
    pub players: Vec<PlayerSpec>,
    /// Pause before an automated player moves
    pub automated_delay_ms: u64,
    /// Seed for random players, entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            win_length: DEFAULT_WIN_LENGTH,
            players: vec![
                PlayerSpec::human("Player 1", Token(1)),
                PlayerSpec::minimax("Computer", Token(2), DEFAULT_SEARCH_DEPTH),
            ],
            automated_delay_ms: DEFAULT_DELAY_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_DIMENSION).contains(&self.rows) || !(1..=MAX_DIMENSION).contains(&self.columns)
        {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.win_length < 2 || self.win_length > self.rows.max(self.columns) {
            return Err(ConfigError::InvalidWinLength {
                win_length: self.win_length,
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.players.len() < 2 {
            return Err(ConfigError::TooFewPlayers(self.players.len()));
        }
        let mut seen = HashSet::new();
        for player in self.players.iter() {
            if !seen.insert(player.token) {
                return Err(ConfigError::DuplicateToken(player.token.0));
            }
        }
        Ok(())
    }

    pub fn automated_delay(&self) -> Duration {
        Duration::from_millis(self.automated_delay_ms)
    }

    pub fn with_players(mut self, players: Vec<PlayerSpec>) -> Self {
        self.players = players;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_delay_ms(mut self, automated_delay_ms: u64) -> Self {
        self.automated_delay_ms = automated_delay_ms;
        self
    }
}
