//! Textual maze representation shared with previously generated maze files.
//!
//! The wall grid serializes row-major as one hexadecimal digit per cell, one line per row.
//! Obstacle cells occupy the `F` digit, the same value as a fully walled cell, so the digit space
//! stays at sixteen values. The complete document appends a blank line, the entry and exit
//! coordinates and the direction-string solution. This layout is a compatibility contract for
//! every reader of previously generated mazes and must round-trip exactly.

use std::fmt::Write as _;

use color_eyre::eyre::{bail, Result};

use crate::{
    maze::{Cell, Maze},
    pathfinding,
};

/// Serializes the wall grid as one hexadecimal line per row.
#[must_use]
pub fn to_hex_lines(maze: &Maze) -> Vec<String> {
    let mut lines = Vec::with_capacity(maze.height());

    for y in 0..maze.height() {
        let mut line = String::with_capacity(maze.width());
        for x in 0..maze.width() {
            let digit = match maze.cell_at(x, y) {
                Cell::Obstacle => 0xF,
                Cell::Open(mask) => mask,
            };
            let _ = write!(line, "{digit:X}");
        }
        lines.push(line);
    }

    lines
}

/// Renders the complete output document for a solved maze.
///
/// The layout is: the hex grid, a blank line, `entry.x,entry.y`, `exit.x,exit.y` and the
/// direction string of the supplied route, each on its own line.
#[must_use]
pub fn write_document(maze: &Maze, path: &[usize]) -> String {
    let (entry_x, entry_y) = maze.coords(maze.entry());
    let (exit_x, exit_y) = maze.coords(maze.exit());
    let directions = pathfinding::to_directions(maze, path);

    let mut document = to_hex_lines(maze).join("\n");
    let _ = write!(
        document,
        "\n\n{entry_x},{entry_y}\n{exit_x},{exit_y}\n{directions}\n"
    );

    document
}

/// Parses a serialized hex grid back into its wall-mask array.
///
/// Returns the grid width, height and the row-major mask values. An obstacle cell is
/// indistinguishable from a fully walled cell in the digit space and parses to `0xF`, exactly as
/// it serialized.
///
/// # Errors
///
/// Fails on an empty grid, on rows of inconsistent length and on characters outside the
/// hexadecimal digit set.
pub fn parse_hex_grid(input: &str) -> Result<(usize, usize, Vec<u8>)> {
    let mut masks = Vec::new();
    let mut width = 0;
    let mut height = 0;

    for line in input.lines() {
        if line.is_empty() {
            break;
        }
        if height == 0 {
            width = line.chars().count();
        } else if line.chars().count() != width {
            bail!("inconsistent row length in serialized grid");
        }
        height += 1;

        for character in line.chars() {
            let Some(digit) = character.to_digit(16) else {
                bail!("invalid character '{character}' in serialized grid");
            };
            masks.push(digit.try_into()?);
        }
    }

    if masks.is_empty() {
        bail!("serialized grid holds no cells");
    }

    Ok((width, height, masks))
}
