use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect_four_engine::{Cell, Grid, Token};

const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Cyan,
    Color::White,
];

fn token_color(token: Token) -> Color {
    PALETTE[token.0 as usize % PALETTE.len()]
}

/// Draws the grid below the cursor, column numbers on top
pub fn display(grid: &Grid) -> Result<()> {
    let mut stdout = stdout();

    let cols: String = (1..=grid.columns())
        .map(|x| (x % 10).to_string())
        .collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;
    for _ in 0..grid.rows() {
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;

    // bottom-left corner of the grid
    let (origin_x, origin_y) = crossterm::cursor::position()?;
    let origin_y = origin_y.saturating_sub(1);

    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let (pos_x, pos_y) = (
                origin_x + column as u16,
                origin_y.saturating_sub(row as u16),
            );

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match grid.cell_at(row, column)? {
                            Cell::Occupied(token) => token_color(token),
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
    }
    stdout
        .queue(MoveTo(origin_x + grid.columns() as u16, origin_y))?
        .queue(PrintStyledContent(style("\n")))?;
    stdout.flush()?;
    Ok(())
}
