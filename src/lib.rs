//! A game engine for 'Connect 4' style games
//!
//! The engine owns the grid, decides when a game is won or drawn, and plays
//! automated opponents either at random or with a depth-limited minimax
//! search using alpha-beta pruning. Rendering and input are left to the caller.
//!
//! # Basic Usage
//!
//! ```
//! use connect_four_engine::{GameConfig, GameOutcome, PlayerSpec, Token, TurnController};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let config = GameConfig::default().with_players(vec![
//!     PlayerSpec::human("You", Token(1)),
//!     PlayerSpec::minimax("Computer", Token(2), 3),
//! ]);
//! let mut game = TurnController::new(config)?;
//!
//! let report = game.apply_move(3)?;
//! assert!(report.accepted);
//! assert_eq!(report.outcome, GameOutcome::Ongoing);
//!
//! // the computer answers once its pending move resolves
//! let replies = game.run_until_human()?;
//! assert_eq!(replies.len(), 1);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod error;

pub mod grid;

pub mod win;

pub mod evaluation;

pub mod search;

pub mod player;

pub mod config;

pub mod controller;

pub mod arena;

mod test;

pub use config::GameConfig;
pub use controller::{AutomatedMove, GameListener, MoveReport, PendingMove, Phase, TurnController};
pub use error::{ConfigError, EngineError, GridError};
pub use grid::{Cell, Grid, Token};
pub use player::{Player, PlayerKind, PlayerSpec};
pub use search::SearchEngine;
pub use win::GameOutcome;

/// The default height of the game grid in tiles
pub const DEFAULT_ROWS: usize = 6;

/// The default width of the game grid in tiles
pub const DEFAULT_COLUMNS: usize = 7;

/// The default number of tiles in a row needed to win
pub const DEFAULT_WIN_LENGTH: usize = 4;

/// The default minimax search depth in plies
pub const DEFAULT_SEARCH_DEPTH: usize = 3;

/// The default pause before an automated player moves, in milliseconds
pub const DEFAULT_DELAY_MS: u64 = 1000;

// ensure a winning line fits on the default grid in every direction
const_assert!(DEFAULT_WIN_LENGTH <= DEFAULT_ROWS && DEFAULT_WIN_LENGTH <= DEFAULT_COLUMNS);
