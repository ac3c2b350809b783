//! Cardinal directions and their wall-bit encoding.

/// The four cardinal directions a passage can take between adjacent cells.
///
/// The discriminant of each variant doubles as the position of that direction's wall bit inside a
/// cell's 4-bit wall mask: bit `d` set means the wall toward direction `d` is closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Toward the previous row (smaller linear index).
    North = 0,
    /// Toward the next column (linear index plus one).
    East = 1,
    /// Toward the next row (larger linear index).
    South = 2,
    /// Toward the previous column (linear index minus one).
    West = 3,
}

impl Direction {
    /// All four directions in discriminant order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Returns the direction pointing the opposite way.
    ///
    /// North and South are opposites, as are East and West. Opening a passage clears the wall bit
    /// for a direction on one cell and the bit for the opposite direction on its neighbor.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Returns the wall-mask bit corresponding to this direction.
    #[must_use]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Returns the single-letter representation used in serialized solutions.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::North => 'N',
            Self::East => 'E',
            Self::South => 'S',
            Self::West => 'W',
        }
    }

    /// Derives the direction of a move between two adjacent linear cell indices.
    ///
    /// The derivation compares index deltas on a grid of the given width: `+1` is East, `-1` is
    /// West, `+width` is South and `-width` is North. A horizontal delta that crosses a row
    /// boundary connects cells that are not actually adjacent and yields `None`, as does any
    /// other non-adjacent pair.
    #[must_use]
    pub const fn between(width: usize, from: usize, to: usize) -> Option<Self> {
        if width == 0 {
            return None;
        }

        if from + 1 == to && to % width != 0 {
            Some(Self::East)
        } else if to + 1 == from && from % width != 0 {
            Some(Self::West)
        } else if from + width == to {
            Some(Self::South)
        } else if to + width == from {
            Some(Self::North)
        } else {
            None
        }
    }
}
