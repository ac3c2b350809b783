//! Command-line front end generating a maze and writing its solved document to a file.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The remaining dependencies are used in the library crate."
)]

use std::{fs, path::PathBuf};

use a_maze_ing::{file_format, generator, pathfinding, Config, Maze};
use clap::Parser;
use color_eyre::{eyre::Result, install};

/// Command-line arguments of the maze generator.
#[derive(Parser)]
#[command(version, about = "Generates a maze and writes its solved document to a file.")]
struct Cli {
    /// Path to the KEY=VALUE configuration file describing the maze.
    config: PathBuf,
}

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let mut maze = Maze::new(
        config.width,
        config.height,
        config.entry,
        config.exit,
        config.perfect,
        config.heart,
    )?;
    generator::generate(&mut maze, config.resolve_seed())?;

    let path = pathfinding::solve(&maze);
    fs::write(&config.output_file, file_format::write_document(&maze, &path))?;

    Ok(())
}
