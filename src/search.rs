//! Depth-bounded minimax search with alpha-beta pruning

use tracing::debug;

use crate::error::EngineError;
use crate::evaluation::evaluate;
use crate::grid::{Grid, Token};
use crate::win::has_connection;

/// An agent picking moves by minimax search over a shared grid
///
/// # Notes
/// The search branches by applying a move to the grid, recursing, and removing
/// the move again, so every node sees the single grid it was handed. The
/// `&mut Grid` borrow gives the engine sole write access for the length of a
/// call. Each insert is undone before the next column is tried, keeping the
/// per-column stack discipline the grid relies on.
///
/// Leaves are always scored from the root player's perspective, at every ply.
#[derive(Clone, Debug)]
pub struct SearchEngine {
    win_length: usize,
    perspective: Token,
    opponent: Token,

    /// The number of minimax nodes visited so far (for diagnostics only)
    pub node_count: usize,
    /// The number of static evaluations performed so far
    pub evaluations: usize,
}

impl SearchEngine {
    pub fn new(win_length: usize, perspective: Token, opponent: Token) -> Self {
        Self {
            win_length,
            perspective,
            opponent,
            node_count: 0,
            evaluations: 0,
        }
    }

    pub fn reset_counters(&mut self) {
        self.node_count = 0;
        self.evaluations = 0;
    }

    fn static_score(&mut self, grid: &Grid) -> i32 {
        self.evaluations += 1;
        evaluate(grid, self.win_length, self.perspective, self.opponent)
    }

    /// Picks the column with the best minimax score, `None` on a full grid
    ///
    /// Columns are tried in ascending order and a later column only replaces
    /// the current choice with a strictly greater score.
    pub fn choose_column(
        &mut self,
        grid: &mut Grid,
        depth: usize,
    ) -> Result<Option<usize>, EngineError> {
        let mut best: Option<(usize, i32)> = None;

        for column in 0..grid.columns() {
            if !grid.is_column_open(column)? {
                continue;
            }
            grid.insert(column, self.perspective)?;
            let score = self.minimax(
                grid,
                depth.saturating_sub(1),
                i32::MIN,
                i32::MAX,
                false,
            );
            undo(grid, column)?;
            let score = score?;

            debug!(column, score, "scored root move");
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((column, score)),
            }
        }

        if let Some((column, score)) = best {
            debug!(
                column,
                score,
                nodes = self.node_count,
                evaluations = self.evaluations,
                "search finished"
            );
        }
        Ok(best.map(|(column, _)| column))
    }

    /// Scores the grid by searching `depth` plies ahead
    ///
    /// `maximizing` selects whose tile is played next: the perspective
    /// player's when true, the opponent's otherwise.
    pub fn minimax(
        &mut self,
        grid: &mut Grid,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> Result<i32, EngineError> {
        self.node_count += 1;

        if depth == 0 || has_connection(grid, self.win_length) {
            return Ok(self.static_score(grid));
        }

        let token = if maximizing {
            self.perspective
        } else {
            self.opponent
        };
        let mut best: Option<i32> = None;

        for column in 0..grid.columns() {
            if !grid.is_column_open(column)? {
                continue;
            }
            grid.insert(column, token)?;
            let score = self.minimax(grid, depth - 1, alpha, beta, !maximizing);
            undo(grid, column)?;
            let score = score?;

            if maximizing {
                let value = best.map_or(score, |best| best.max(score));
                best = Some(value);
                alpha = alpha.max(value);
            } else {
                let value = best.map_or(score, |best| best.min(score));
                best = Some(value);
                beta = beta.min(value);
            }
            // the opponent will never allow this line, stop looking
            if beta <= alpha {
                break;
            }
        }

        match best {
            Some(score) => Ok(score),
            // no open column left, the full grid is a leaf
            None => Ok(self.static_score(grid)),
        }
    }
}

fn undo(grid: &mut Grid, column: usize) -> Result<(), EngineError> {
    grid.remove_top_of(column)
        .map(|_| ())
        .map_err(|_| EngineError::EmptyColumnOnUndo(column))
}
