use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tile_merge_core::{Difficulty, DEFAULT_GRID_SIDE};

use crate::Args;

/// Store file used when neither the command line nor the config file names one.
pub(crate) const DEFAULT_STORE_PATH: &str = "tile-merge-scores.json";
/// Log specification used when none is configured.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "warn";

/// Optional settings read from a TOML file.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) grid_side: Option<usize>,
    pub(crate) store_path: Option<PathBuf>,
    pub(crate) seed: Option<u64>,
    pub(crate) log_level: Option<String>,
}

impl FileConfig {
    /// Reads and parses the config file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid config toml contents")
    }
}

/// Effective settings after command-line values override file values.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) difficulty: Difficulty,
    pub(crate) grid_side: usize,
    pub(crate) store_path: PathBuf,
    pub(crate) seed: u64,
    pub(crate) log_level: String,
    pub(crate) log_dir: Option<PathBuf>,
    pub(crate) color: bool,
}

impl Settings {
    /// Merges parsed arguments over the file configuration.
    ///
    /// A missing seed is drawn from the thread RNG.
    pub(crate) fn resolve(args: Args, file: FileConfig) -> Self {
        Self {
            difficulty: args.difficulty.or(file.difficulty).unwrap_or_default(),
            grid_side: args
                .size
                .or(file.grid_side)
                .unwrap_or(DEFAULT_GRID_SIDE),
            store_path: args
                .store
                .or(file.store_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            seed: args.seed.or(file.seed).unwrap_or_else(rand::random),
            log_level: args
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            log_dir: args.log_dir,
            color: args.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_every_supported_key() {
        let config = FileConfig::parse(
            r#"
                difficulty = "hard"
                grid_side = 5
                store_path = "scores/board.json"
                seed = 42
                log_level = "debug"
            "#,
        )
        .expect("valid config");

        assert_eq!(
            config,
            FileConfig {
                difficulty: Some(Difficulty::Hard),
                grid_side: Some(5),
                store_path: Some(PathBuf::from("scores/board.json")),
                seed: Some(42),
                log_level: Some("debug".to_owned()),
            }
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(FileConfig::parse("speed = 3").is_err());
    }

    #[test]
    fn command_line_overrides_file_values() {
        let args = Args::parse_from(["tile-merge", "--difficulty", "EASY", "--seed", "9"]);
        let file = FileConfig {
            difficulty: Some(Difficulty::Hard),
            grid_side: Some(6),
            seed: Some(1),
            ..FileConfig::default()
        };

        let settings = Settings::resolve(args, file);
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.grid_side, 6);
        assert_eq!(settings.store_path, PathBuf::from(DEFAULT_STORE_PATH));
        assert_eq!(settings.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let args = Args::parse_from(["tile-merge", "--seed", "3"]);
        let settings = Settings::resolve(args, FileConfig::default());
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.grid_side, DEFAULT_GRID_SIDE);
        assert!(!settings.color);
    }
}
