//! Static heuristic evaluation of a position
//!
//! Every window of `length` cells in a straight line is scored with
//! [`score_line`] and the scores are summed. Higher is better for the
//! perspective player. The table only rewards nearly complete lines, so
//! shallow searches play imperfectly.

use crate::grid::{Cell, Grid, Token};
use crate::win::Direction;

/// Score of a window holding the perspective player's completed line
pub const WIN_LINE_SCORE: i32 = 100;
/// Score of a window one tile short of completion with no opponent tiles
pub const THREE_SCORE: i32 = 5;
/// Score of a window two tiles short of completion with no opponent tiles
pub const TWO_SCORE: i32 = 2;
/// Score of a window where the opponent is one tile short and unblocked
pub const OPPONENT_THREE_SCORE: i32 = -4;

/// Scores a single window of cells from `perspective`'s point of view
///
/// With a window of 4 this is:
///
/// | own | opponent | score |
/// |-----|----------|-------|
/// | 4   | -        | 100   |
/// | 3   | 0        | 5     |
/// | 2   | 0        | 2     |
/// | 0   | 3        | -4    |
/// | otherwise |    | 0     |
pub fn score_line(cells: &[Cell], perspective: Token, opponent: Token) -> i32 {
    let length = cells.len();
    let own = cells
        .iter()
        .filter(|&&cell| cell == Cell::Occupied(perspective))
        .count();
    let opp = cells
        .iter()
        .filter(|&&cell| cell == Cell::Occupied(opponent))
        .count();

    if own == length {
        WIN_LINE_SCORE
    } else if own > 0 && opp == 0 && own + 1 == length {
        THREE_SCORE
    } else if own > 0 && opp == 0 && own + 2 == length {
        TWO_SCORE
    } else if own == 0 && opp > 0 && opp + 1 == length {
        OPPONENT_THREE_SCORE
    } else {
        0
    }
}

/// Calls `f` with every in-bounds window of `length` cells, once per
/// orientation
fn for_each_window<F: FnMut(&[Cell])>(grid: &Grid, length: usize, mut f: F) {
    if length == 0 {
        return;
    }
    let mut window = Vec::with_capacity(length);
    let span = length as isize - 1;

    for &direction in Direction::ALL.iter() {
        let (dy, dx) = direction.step();
        for row in 0..grid.rows() as isize {
            for column in 0..grid.columns() as isize {
                // skip windows whose far end leaves the grid
                if grid.get_signed(row + dy * span, column + dx * span).is_none() {
                    continue;
                }
                window.clear();
                window.extend(
                    (0..length as isize)
                        .filter_map(|i| grid.get_signed(row + dy * i, column + dx * i)),
                );
                f(&window);
            }
        }
    }
}

/// Sums [`score_line`] over every window of `length` cells on the grid
pub fn evaluate(grid: &Grid, length: usize, perspective: Token, opponent: Token) -> i32 {
    let mut score = 0;
    for_each_window(grid, length, |window| {
        score += score_line(window, perspective, opponent)
    });
    score
}

/// Number of windows [`evaluate`] scores on a grid, used in tests
#[cfg(test)]
pub(crate) fn window_count(grid: &Grid, length: usize) -> usize {
    let mut count = 0;
    for_each_window(grid, length, |_| count += 1);
    count
}
