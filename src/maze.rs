//! Grid model for rectangular mazes.
//!
//! This module contains the [`Maze`] structure holding the maze dimensions, the entry and exit
//! cells, and the per-cell wall state. The maze is created fully walled, mutated exclusively by a
//! single generation run, and treated as immutable by the path finder and every other consumer.

use crate::{direction::Direction, error::MazeError};

/// Wall mask with all four walls closed.
///
/// Every open cell starts out with this mask; generation clears individual bits as passages are
/// carved.
pub const CLOSED: u8 = 0b1111;

/// State of a single maze cell.
///
/// A cell is either an obstacle, permanently excluded from the playable graph, or an open cell
/// carrying a 4-bit wall mask. Bit `d` set means the wall toward [`Direction`] `d` is closed.
/// Transient walk bookkeeping lives in the generator and never leaks into this type, so an
/// obstacle can never be confused with a wall mask or a visited marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    /// A cell excluded from the playable graph, either outside a decorative silhouette or part of
    /// the fixed "42" sign.
    Obstacle,
    /// A playable cell with its 4-bit wall mask.
    Open(u8),
}

impl Cell {
    /// Returns `true` when the cell is an obstacle.
    #[must_use]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Obstacle)
    }

    /// Returns `true` when the wall toward the given direction is open.
    ///
    /// Obstacles have no wall-mask meaning and report every direction as closed.
    #[must_use]
    pub const fn is_open_toward(self, direction: Direction) -> bool {
        match self {
            Self::Obstacle => false,
            Self::Open(mask) => mask & direction.bit() == 0,
        }
    }
}

/// A rectangular maze with designated entry and exit cells.
///
/// Cells are identified by their linear index `idx = y * width + x`; the x/y pair is only a
/// display convenience. All algorithms in this crate operate on linear indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    /// Number of columns in the grid.
    width: usize,
    /// Number of rows in the grid.
    height: usize,
    /// Linear index of the entry cell.
    entry: usize,
    /// Linear index of the exit cell.
    exit: usize,
    /// Whether generation should produce a perfect maze (no loops).
    is_perfect: bool,
    /// Whether generation should mask the grid with a heart-shaped silhouette.
    heart: bool,
    /// Per-cell state, row-major.
    cells: Vec<Cell>,
}

impl Maze {
    /// Creates a new fully walled maze with the given dimensions and endpoints.
    ///
    /// The entry and exit are supplied as `(x, y)` pairs and stored as linear indices. Every cell
    /// starts out open with all four walls closed; decorative obstacles are laid out later by the
    /// generator.
    ///
    /// # Errors
    ///
    /// - [`MazeError::InvalidEntryExit`] when either endpoint falls out of bounds or the entry
    ///   equals the exit.
    pub fn new(
        width: usize,
        height: usize,
        entry: (usize, usize),
        exit: (usize, usize),
        is_perfect: bool,
        heart: bool,
    ) -> Result<Self, MazeError> {
        if entry.0 >= width || entry.1 >= height || exit.0 >= width || exit.1 >= height {
            return Err(MazeError::InvalidEntryExit);
        }
        if entry == exit {
            return Err(MazeError::InvalidEntryExit);
        }

        Ok(Self {
            width,
            height,
            entry: entry.1 * width + entry.0,
            exit: exit.1 * width + exit.0,
            is_perfect,
            heart,
            cells: vec![Cell::Open(CLOSED); width * height],
        })
    }

    /// Builds a maze from a pre-existing cell vector.
    ///
    /// This constructor serves callers that rebuild a maze from its serialized representation or
    /// assemble one by hand. The endpoints are supplied as linear indices and, unlike
    /// [`Maze::new`], are allowed to coincide; solving such a maze yields the single-cell path.
    /// The generation flags are irrelevant for a pre-built grid and default to a perfect,
    /// non-masked layout.
    ///
    /// # Errors
    ///
    /// - [`MazeError::InvalidEntryExit`] when either endpoint is not a valid index into the cell
    ///   vector, or when the vector length does not match the dimensions.
    pub fn from_cells(
        width: usize,
        height: usize,
        entry: usize,
        exit: usize,
        cells: Vec<Cell>,
    ) -> Result<Self, MazeError> {
        if cells.len() != width * height || entry >= cells.len() || exit >= cells.len() {
            return Err(MazeError::InvalidEntryExit);
        }

        Ok(Self {
            width,
            height,
            entry,
            exit,
            is_perfect: true,
            heart: false,
            cells,
        })
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the linear index of the entry cell.
    #[must_use]
    pub const fn entry(&self) -> usize {
        self.entry
    }

    /// Returns the linear index of the exit cell.
    #[must_use]
    pub const fn exit(&self) -> usize {
        self.exit
    }

    /// Returns whether the maze was requested as a perfect maze.
    #[must_use]
    pub const fn is_perfect(&self) -> bool {
        self.is_perfect
    }

    /// Returns whether the maze was requested with the heart silhouette.
    #[must_use]
    pub const fn heart(&self) -> bool {
        self.heart
    }

    /// Returns the total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` when the maze holds no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the state of the cell at the given linear index.
    ///
    /// # Panics
    ///
    /// Panics when the index is out of range.
    #[expect(
        clippy::indexing_slicing,
        reason = "An out-of-range index is a documented panic condition of this accessor."
    )]
    #[must_use]
    pub fn cell(&self, idx: usize) -> Cell {
        self.cells[idx]
    }

    /// Returns the state of the cell at the given coordinates.
    ///
    /// # Panics
    ///
    /// Panics when the coordinates are out of range.
    #[expect(
        clippy::indexing_slicing,
        reason = "Out-of-range coordinates are a documented panic condition of this accessor."
    )]
    #[must_use]
    pub fn cell_at(&self, x: usize, y: usize) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Converts coordinates into a linear cell index.
    #[must_use]
    pub const fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Converts a linear cell index back into `(x, y)` coordinates.
    #[must_use]
    pub const fn coords(&self, idx: usize) -> (usize, usize) {
        (idx % self.width, idx / self.width)
    }

    /// Marks the cell at the given linear index as an obstacle.
    ///
    /// An out-of-range index is ignored.
    pub(crate) fn set_obstacle(&mut self, idx: usize) {
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = Cell::Obstacle;
        }
    }

    /// Opens the passage between two adjacent open cells.
    ///
    /// Clears the wall bit of `from` toward `direction` and the opposite bit of `to`, keeping the
    /// wall-symmetry invariant intact. Obstacles and out-of-range indices are left untouched;
    /// generation never routes a passage into either.
    pub(crate) fn open_passage(&mut self, from: usize, to: usize, direction: Direction) {
        if let Some(Cell::Open(mask)) = self.cells.get_mut(from) {
            *mask &= !direction.bit();
        }
        if let Some(Cell::Open(mask)) = self.cells.get_mut(to) {
            *mask &= !direction.opposite().bit();
        }
    }
}
