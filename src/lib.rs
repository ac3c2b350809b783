//! A maze generator and shortest-path solver built on Wilson's algorithm.
//!
//! This crate builds rectangular mazes as uniform random spanning trees using loop-erased random
//! walks, then solves them with a breadth-first search. Both algorithms come in two flavors: a
//! one-shot call that runs to completion, and a resumable run object that performs one unit of
//! work per call so a caller can animate progress. Driving a run to exhaustion produces exactly
//! the same maze or path as the one-shot call under the same seed.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The clap dependency is only used in the binary crate."
)]

pub mod config;
pub mod direction;
pub mod error;
pub mod file_format;
pub mod generator;
pub mod maze;
pub mod pathfinding;
pub mod stepwise;

pub use config::Config;
pub use direction::Direction;
pub use error::MazeError;
pub use generator::{generate, generate_steps, GenerationRun, GenerationStep};
pub use maze::{Cell, Maze};
pub use pathfinding::{solve, solve_steps, to_directions, SolveRun, SolveStep};
pub use stepwise::{Steps, Stepwise, Tempo};
