//! Connection detection and game outcomes

use crate::grid::{Cell, Grid, Token};

/// A step through the grid as (row delta, column delta)
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Direction {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::Diagonal,
        Direction::AntiDiagonal,
    ];

    pub fn step(self) -> (isize, isize) {
        match self {
            Direction::Horizontal => (0, 1),
            Direction::Vertical => (1, 0),
            Direction::Diagonal => (1, 1),
            Direction::AntiDiagonal => (1, -1),
        }
    }
}

/// A run of same-token cells found on the grid
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Connection {
    pub token: Token,
    /// (row, column) of the first cell of the run
    pub start: (usize, usize),
    pub direction: Direction,
}

/// Finds any line of `length` same-token cells
///
/// Which line is returned when several exist is unspecified.
pub fn find_connection(grid: &Grid, length: usize) -> Option<Connection> {
    if length == 0 {
        return None;
    }
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let token = match grid.get(row, column) {
                Some(Cell::Occupied(token)) => token,
                _ => continue,
            };
            for &direction in Direction::ALL.iter() {
                let (dy, dx) = direction.step();
                let run = (1..length as isize).all(|i| {
                    grid.get_signed(row as isize + dy * i, column as isize + dx * i)
                        == Some(Cell::Occupied(token))
                });
                if run {
                    return Some(Connection {
                        token,
                        start: (row, column),
                        direction,
                    });
                }
            }
        }
    }
    None
}

pub fn has_connection(grid: &Grid, length: usize) -> bool {
    find_connection(grid, length).is_some()
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameOutcome {
    Ongoing,
    Win(Token),
    Draw,
}

impl GameOutcome {
    /// Computes the outcome of `grid` from scratch
    pub fn of(grid: &Grid, win_length: usize) -> Self {
        match find_connection(grid, win_length) {
            Some(connection) => GameOutcome::Win(connection.token),
            None if grid.is_full() => GameOutcome::Draw,
            None => GameOutcome::Ongoing,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }
}
