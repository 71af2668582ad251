//! Turn sequencing and automated play
//!
//! The controller is the only way a front end changes the game. Human turns
//! come in through [`TurnController::apply_move`]. Automated turns are
//! scheduled as a [`PendingMove`] that resolves after the configured delay.
//! Each pending move carries the generation it was scheduled in, and
//! [`TurnController::reset`] bumps the generation so moves scheduled before a
//! reset are discarded instead of landing on the new grid.

use std::time::{Duration, Instant};

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::error::{ConfigError, EngineError, GridError};
use crate::grid::{Grid, Token};
use crate::player::{Player, PlayerKind};
use crate::search::SearchEngine;
use crate::win::GameOutcome;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Phase {
    /// Waiting for the player at this index to move
    AwaitingMove(usize),
    GameOver(GameOutcome),
}

/// Result of a move request
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct MoveReport {
    /// False when the column was full, in which case nothing changed
    pub accepted: bool,
    pub row: Option<usize>,
    pub outcome: GameOutcome,
}

/// An automated turn waiting to be played
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct PendingMove {
    pub generation: u64,
    pub player: usize,
    pub due: Instant,
}

/// An automated turn that has been played
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct AutomatedMove {
    pub player: usize,
    pub token: Token,
    pub column: usize,
    pub row: usize,
    pub outcome: GameOutcome,
}

/// Receives notifications meant for the presentation layer
pub trait GameListener {
    fn on_automated_move(&mut self, _automated_move: &AutomatedMove) {}

    /// The grid has been cleared
    fn on_reset(&mut self) {}
}

pub struct TurnController {
    grid: Grid,
    win_length: usize,
    players: Vec<Player>,
    phase: Phase,
    generation: u64,
    pending: Option<PendingMove>,
    delay: Duration,
    history: Vec<usize>,
    rng: StdRng,
    listener: Option<Box<dyn GameListener>>,
}

impl TurnController {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut controller = Self {
            grid: Grid::new(config.rows, config.columns),
            win_length: config.win_length,
            players: Player::seat_all(&config.players),
            phase: Phase::AwaitingMove(0),
            generation: 0,
            pending: None,
            delay: config.automated_delay(),
            history: Vec::new(),
            rng,
            listener: None,
        };
        controller.schedule_if_automated(Instant::now());
        Ok(controller)
    }

    pub fn with_listener(mut self, listener: Box<dyn GameListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn win_length(&self) -> usize {
        self.win_length
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The player to move, `None` once the game is over
    pub fn active_player(&self) -> Option<&Player> {
        match self.phase {
            Phase::AwaitingMove(index) => self.players.get(index),
            Phase::GameOver(_) => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending(&self) -> Option<PendingMove> {
        self.pending
    }

    pub fn outcome(&self) -> GameOutcome {
        GameOutcome::of(&self.grid, self.win_length)
    }

    /// Moves played since the last reset as one-indexed column digits
    pub fn history(&self) -> String {
        self.history
            .iter()
            .map(|column| (column + 1).to_string())
            .collect()
    }

    /// Plays `column` for the active human player
    ///
    /// A full column is rejected with `accepted: false` and leaves the game
    /// unchanged.
    pub fn apply_move(&mut self, column: usize) -> Result<MoveReport, EngineError> {
        if column >= self.grid.columns() {
            return Err(EngineError::InvalidColumn {
                column,
                columns: self.grid.columns(),
            });
        }
        let index = match self.phase {
            Phase::GameOver(_) => return Err(EngineError::GameOver),
            Phase::AwaitingMove(index) => index,
        };
        if self.players[index].kind.is_automated() {
            return Err(EngineError::NotAwaitingHuman);
        }

        match self.place(index, column, Instant::now())? {
            Some((row, outcome)) => Ok(MoveReport {
                accepted: true,
                row: Some(row),
                outcome,
            }),
            None => Ok(MoveReport {
                accepted: false,
                row: None,
                outcome: GameOutcome::Ongoing,
            }),
        }
    }

    /// A front end reporting a clicked cell; only the column matters
    pub fn click_cell(&mut self, _row: usize, column: usize) -> Result<MoveReport, EngineError> {
        self.apply_move(column)
    }

    /// Plays the pending automated move if it is due at `now`
    pub fn poll(&mut self, now: Instant) -> Result<Option<AutomatedMove>, EngineError> {
        match self.pending {
            Some(pending) if now >= pending.due => self.resolve(pending),
            _ => Ok(None),
        }
    }

    /// Plays the automated move `ticket` was issued for, ignoring its due time
    ///
    /// Tickets from an earlier generation, or already resolved, are discarded.
    pub fn resolve(&mut self, ticket: PendingMove) -> Result<Option<AutomatedMove>, EngineError> {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding automated move scheduled before a reset"
            );
            return Ok(None);
        }
        if self.pending != Some(ticket) {
            debug!(player = ticket.player, "discarding automated move already resolved");
            return Ok(None);
        }
        self.pending = None;

        let player = self.players[ticket.player].clone();
        let column = match self.automated_column(&player)? {
            Some(column) => column,
            None => return Ok(None),
        };
        let (row, outcome) = self
            .place(ticket.player, column, Instant::now())?
            .ok_or(EngineError::Grid(GridError::ColumnFull(column)))?;

        let automated_move = AutomatedMove {
            player: ticket.player,
            token: player.token,
            column,
            row,
            outcome,
        };
        if let Some(listener) = self.listener.as_mut() {
            listener.on_automated_move(&automated_move);
        }
        Ok(Some(automated_move))
    }

    /// Plays automated turns back to back until a human is to move or the
    /// game ends
    pub fn run_until_human(&mut self) -> Result<Vec<AutomatedMove>, EngineError> {
        let mut played = Vec::new();
        while let Some(pending) = self.pending {
            match self.resolve(pending)? {
                Some(automated_move) => played.push(automated_move),
                None => break,
            }
        }
        Ok(played)
    }

    /// Clears the grid and hands the first move back to the first player
    pub fn reset(&mut self) {
        self.grid.reset();
        self.generation += 1;
        self.pending = None;
        self.history.clear();
        self.phase = Phase::AwaitingMove(0);
        info!(generation = self.generation, "game reset");

        if let Some(listener) = self.listener.as_mut() {
            listener.on_reset();
        }
        self.schedule_if_automated(Instant::now());
    }

    fn automated_column(&mut self, player: &Player) -> Result<Option<usize>, EngineError> {
        match player.kind {
            PlayerKind::Human => Ok(None),
            PlayerKind::Random => {
                let open: Vec<usize> = self.grid.open_columns().collect();
                Ok(open.choose(&mut self.rng).copied())
            }
            PlayerKind::Minimax { search_depth } => {
                let mut engine = SearchEngine::new(self.win_length, player.token, player.opponent);
                engine.choose_column(&mut self.grid, search_depth)
            }
        }
    }

    /// Drops the tile of player `index` into `column` and advances the turn,
    /// returning `None` if the column is full
    fn place(
        &mut self,
        index: usize,
        column: usize,
        now: Instant,
    ) -> Result<Option<(usize, GameOutcome)>, EngineError> {
        let player = &self.players[index];
        let row = match self.grid.insert(column, player.token) {
            Ok(row) => row,
            Err(GridError::ColumnFull(_)) => {
                info!(column, player = %player.label, "rejected move into full column");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        self.history.push(column);
        info!(column, row, player = %player.label, "move applied");

        let outcome = self.outcome();
        if outcome.is_terminal() {
            info!(?outcome, moves = %self.history(), grid = %self.grid, "game over");
            self.phase = Phase::GameOver(outcome);
            self.pending = None;
        } else {
            self.phase = Phase::AwaitingMove((index + 1) % self.players.len());
            self.schedule_if_automated(now);
        }
        Ok(Some((row, outcome)))
    }

    fn schedule_if_automated(&mut self, now: Instant) {
        if let Phase::AwaitingMove(index) = self.phase {
            if self.players[index].kind.is_automated() {
                self.pending = Some(PendingMove {
                    generation: self.generation,
                    player: index,
                    due: now + self.delay,
                });
            }
        }
    }
}
