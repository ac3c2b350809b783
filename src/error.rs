//! Failure taxonomy for maze construction and generation.

use thiserror::Error;

/// Errors reported by maze construction and generation.
///
/// Both variants are detected synchronously at the start of the relevant operation, before any
/// randomness is consumed and before any cell is mutated, so a failed call leaves the maze
/// exactly as it was handed in.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    /// The maze dimensions cannot fit the mandatory "42" sign.
    ///
    /// The sign occupies a fixed block of cells around the grid center and requires a width
    /// greater than 8 and a height greater than 6.
    #[error("maze is too small for the '42' sign")]
    GridTooSmall,
    /// The entry or exit coordinates are unusable.
    ///
    /// This variant covers coordinates that fall out of bounds, an entry equal to the exit, and
    /// endpoints that land on an obstacle cell after the decorative shapes have been laid out.
    #[error("invalid entry or exit coordinates")]
    InvalidEntryExit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            MazeError::GridTooSmall.to_string(),
            "maze is too small for the '42' sign"
        );
        assert_eq!(
            MazeError::InvalidEntryExit.to_string(),
            "invalid entry or exit coordinates"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(MazeError::GridTooSmall, MazeError::GridTooSmall);
        assert_ne!(MazeError::GridTooSmall, MazeError::InvalidEntryExit);
    }
}
