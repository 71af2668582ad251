//! Column-stacked game grid
//!
//! Tiles are pushed onto and popped off the top of each column like a stack,
//! so a cell below an occupied cell is never empty.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// The identity of a player's tiles
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(pub u8);

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    Occupied(Token),
}

impl Cell {
    pub fn token(&self) -> Option<Token> {
        match self {
            Cell::Occupied(token) => Some(*token),
            Cell::Empty => None,
        }
    }
}

/// A `rows` x `columns` game grid
///
/// Row 0 is the bottom row, column 0 the leftmost column.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>, // cells are stored left-to-right, bottom-to-top
    heights: Vec<usize>,
}

impl Grid {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
            heights: vec![0; columns],
        }
    }

    /// Builds a position from a string of one-indexed column digits,
    /// cycling through `tokens` for each move
    ///
    /// ```
    /// use connect_four_engine::grid::{Cell, Grid, Token};
    ///
    /// let grid = Grid::from_moves(6, 7, &[Token(1), Token(2)], "44")?;
    /// assert_eq!(grid.cell_at(1, 3)?, Cell::Occupied(Token(2)));
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    pub fn from_moves<S: AsRef<str>>(
        rows: usize,
        columns: usize,
        tokens: &[Token],
        moves: S,
    ) -> anyhow::Result<Self> {
        if tokens.is_empty() {
            anyhow::bail!("at least one token is needed to replay moves");
        }
        let mut grid = Self::new(rows, columns);

        for (turn, column_char) in moves.as_ref().chars().enumerate() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=9) => {
                    grid.insert(column - 1, tokens[turn % tokens.len()])?;
                }
                _ => anyhow::bail!("could not parse '{}' as a valid move", column_char),
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn check_column(&self, column: usize) -> Result<(), GridError> {
        if column >= self.columns {
            return Err(GridError::InvalidColumn {
                column,
                columns: self.columns,
            });
        }
        Ok(())
    }

    /// Drops `token` into `column`, returning the row it landed on
    ///
    /// A full column is left untouched.
    pub fn insert(&mut self, column: usize, token: Token) -> Result<usize, GridError> {
        self.check_column(column)?;
        let row = self.heights[column];
        if row >= self.rows {
            return Err(GridError::ColumnFull(column));
        }
        self.cells[column + self.columns * row] = Cell::Occupied(token);
        self.heights[column] += 1;
        Ok(row)
    }

    /// Removes the topmost tile of `column` and returns its token
    ///
    /// Undoes the latest `insert` into the same column, so search must pair
    /// inserts and removals last-in first-out per column.
    pub fn remove_top_of(&mut self, column: usize) -> Result<Token, GridError> {
        self.check_column(column)?;
        let height = self.heights[column];
        if height == 0 {
            return Err(GridError::EmptyColumn(column));
        }
        let index = column + self.columns * (height - 1);
        let token = self.cells[index]
            .token()
            .ok_or(GridError::EmptyColumn(column))?;
        self.cells[index] = Cell::Empty;
        self.heights[column] -= 1;
        Ok(token)
    }

    /// Whether the top row of `column` is still empty
    pub fn is_column_open(&self, column: usize) -> Result<bool, GridError> {
        self.check_column(column)?;
        Ok(self.heights[column] < self.rows)
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Result<Cell, GridError> {
        self.check_column(column)?;
        Ok(self.get(row, column).unwrap_or(Cell::Empty))
    }

    /// Bounds-checked lookup taking signed coordinates, `None` when off the grid
    pub(crate) fn get_signed(&self, row: isize, column: isize) -> Option<Cell> {
        if row < 0 || column < 0 {
            return None;
        }
        self.get(row as usize, column as usize)
    }

    pub(crate) fn get(&self, row: usize, column: usize) -> Option<Cell> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        Some(self.cells[column + self.columns * row])
    }

    /// Number of tiles stacked in `column`
    pub fn height(&self, column: usize) -> Result<usize, GridError> {
        self.check_column(column)?;
        Ok(self.heights[column])
    }

    /// Open columns in ascending order
    pub fn open_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.columns).filter(move |&column| self.heights[column] < self.rows)
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height >= self.rows)
    }

    /// Number of occupied cells
    pub fn occupied(&self) -> usize {
        self.heights.iter().sum()
    }

    pub fn reset(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = Cell::Empty;
        }
        for height in self.heights.iter_mut() {
            *height = 0;
        }
    }
}

impl fmt::Display for Grid {
    /// Plain-text rendering, top row first, `.` for empty cells
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..self.rows).rev() {
            for column in 0..self.columns {
                match self.cells[column + self.columns * row] {
                    Cell::Empty => write!(f, ".")?,
                    Cell::Occupied(token) => write!(f, "{}", token)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
