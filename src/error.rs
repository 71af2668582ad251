//! Error types for the engine

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single grid operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("column {column} out of range for a grid with {columns} columns")]
    InvalidColumn { column: usize, columns: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {0} has no tile to remove")]
    EmptyColumn(usize),
}

/// Errors raised while building or loading a [`GameConfig`](crate::config::GameConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("a game needs at least two players, got {0}")]
    TooFewPlayers(usize),

    #[error("token {0} is used by more than one player")]
    DuplicateToken(u8),

    #[error("invalid grid dimensions {rows}x{columns}, both must be between 1 and 64")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("win length {win_length} cannot fit on a {rows}x{columns} grid")]
    InvalidWinLength {
        win_length: usize,
        rows: usize,
        columns: usize,
    },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised by the turn controller and the search engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("column {column} out of range for a grid with {columns} columns")]
    InvalidColumn { column: usize, columns: usize },

    /// Apply/undo pairing was broken during search; always a search bug
    #[error("search tried to undo a move in empty column {0}")]
    EmptyColumnOnUndo(usize),

    #[error("it is not a human player's turn")]
    NotAwaitingHuman,

    #[error("the game is over, reset to play again")]
    GameOver,

    #[error(transparent)]
    Grid(GridError),
}

impl From<GridError> for EngineError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::InvalidColumn { column, columns } => {
                EngineError::InvalidColumn { column, columns }
            }
            GridError::EmptyColumn(column) => EngineError::EmptyColumnOnUndo(column),
            other => EngineError::Grid(other),
        }
    }
}
