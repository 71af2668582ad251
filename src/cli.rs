use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Play Connect 4 style games against random or minimax opponents
#[derive(Parser, Debug)]
#[command(name = "connect_four", version)]
pub struct Cli {
    /// TOML game config; its players are used as-is instead of asking
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Play a batch of computer-only games and print the tally
    Arena {
        /// Number of games to play
        #[arg(default_value_t = 100)]
        games: usize,

        /// TOML game config, humans in it are replaced by random players
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Player control is asked for only when no config file decides it
    pub fn prompts_for_players(&self) -> bool {
        self.config.is_none()
    }
}

/// Reads a one-indexed column number, leaving range checks to the game
pub fn parse_column(input: &str) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(column) if column >= 1 => Some(column - 1),
        _ => None,
    }
}
