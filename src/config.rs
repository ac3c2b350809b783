//! Configuration-file loading for the command-line front end.
//!
//! A configuration file holds `KEY=VALUE` lines describing the maze to generate: its dimensions,
//! endpoints, output file and generation flags. Blank lines and lines starting with `#` are
//! skipped; unknown keys are rejected so typos surface immediately instead of silently falling
//! back to defaults.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{bail, OptionExt as _, Result};

/// The set of keys a configuration file may define.
const VALID_KEYS: [&str; 8] = [
    "WIDTH", "HEIGHT", "ENTRY", "EXIT", "OUTPUT_FILE", "PERFECT", "HEART", "SEED",
];

/// Parsed maze-generation configuration.
///
/// Every field except the heart flag and the seed is mandatory in the file. A missing seed means
/// the caller should draw a random one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of columns of the maze.
    pub width: usize,
    /// Number of rows of the maze.
    pub height: usize,
    /// Entry cell as an `(x, y)` pair.
    pub entry: (usize, usize),
    /// Exit cell as an `(x, y)` pair.
    pub exit: (usize, usize),
    /// File the generated document is written to; must carry a `.txt` extension.
    pub output_file: PathBuf,
    /// Whether to generate a perfect maze.
    pub perfect: bool,
    /// Whether to mask the maze with the heart silhouette.
    pub heart: bool,
    /// Random seed, or `None` to let the caller pick one.
    pub seed: Option<u64>,
}

impl Config {
    /// Reads and parses a configuration file from disk.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or when its contents fail [`Config::parse`].
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parses configuration contents.
    ///
    /// # Errors
    ///
    /// Fails on malformed lines, unknown keys, missing mandatory keys, non-boolean PERFECT or
    /// HEART values, endpoint coordinates that fall out of bounds or coincide, and output files
    /// without a `.txt` extension.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut values = HashMap::new();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                bail!("malformed configuration line: '{line}'");
            };
            let key = key.trim();
            if !VALID_KEYS.contains(&key) {
                bail!("invalid key: '{key}'");
            }
            let _ = values.insert(key.to_owned(), value.trim().to_owned());
        }

        let width: usize = require(&values, "WIDTH")?.parse()?;
        let height: usize = require(&values, "HEIGHT")?.parse()?;
        let entry = parse_coordinates(require(&values, "ENTRY")?, width, height)?;
        let exit = parse_coordinates(require(&values, "EXIT")?, width, height)?;
        if entry == exit {
            bail!("invalid (start, end) coordinates");
        }

        let output_file = require(&values, "OUTPUT_FILE")?;
        if !output_file.ends_with(".txt") {
            bail!("invalid output file type ('*.txt' required)");
        }

        let perfect = parse_flag(require(&values, "PERFECT")?)?;
        let heart = if let Some(value) = values.get("HEART") {
            parse_flag(value)?
        } else {
            false
        };
        let seed = if let Some(value) = values.get("SEED") {
            Some(value.parse()?)
        } else {
            None
        };

        Ok(Self {
            width,
            height,
            entry,
            exit,
            output_file: PathBuf::from(output_file),
            perfect,
            heart,
            seed,
        })
    }

    /// Returns the configured seed, or draws a uniformly random one when the file left it unset.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Looks up a mandatory key in the parsed value map.
fn require<'values>(values: &'values HashMap<String, String>, key: &str) -> Result<&'values str> {
    values
        .get(key)
        .map(String::as_str)
        .ok_or_eyre(format!("missing key: '{key}'"))
}

/// Parses an `x,y` coordinate pair and checks it against the maze bounds.
fn parse_coordinates(value: &str, width: usize, height: usize) -> Result<(usize, usize)> {
    let Some((x, y)) = value.split_once(',') else {
        bail!("entry, exit accept 'x,y'");
    };
    let x: i64 = x.trim().parse()?;
    let y: i64 = y.trim().parse()?;
    if x < 0 || y < 0 || x >= i64::try_from(width)? || y >= i64::try_from(height)? {
        bail!("invalid (start, end) coordinates");
    }

    Ok((usize::try_from(x)?, usize::try_from(y)?))
}

/// Parses a case-insensitive boolean flag value.
fn parse_flag(value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("different from 'True' or 'False': '{value}'"),
    }
}
