#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tile Merge in a terminal.

mod config;
mod file_store;
mod logging;
mod session;
mod terminal;

use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tile_merge_core::Difficulty;
use tile_merge_rendering::{Color, Presentation, RenderingBackend};
use tile_merge_system_leaderboard::Leaderboard;

use crate::{
    config::{FileConfig, Settings},
    file_store::FileStore,
    session::GameSession,
    terminal::TerminalBackend,
};

const WINDOW_TITLE: &str = "Tile Merge";

/// Command-line arguments; each one overrides the matching config file key.
#[derive(Debug, Parser)]
#[command(name = "tile-merge", version, about = "Slide and merge numbered tiles.")]
struct Args {
    /// Difficulty to start on (easy, medium or hard).
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Number of cells along each side of the board.
    #[arg(long)]
    size: Option<usize>,

    /// Seed for tile spawning; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file holding leaderboards and the best score.
    #[arg(long)]
    store: Option<PathBuf>,

    /// TOML file with default settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log specification such as `info` or `tile_merge_world=debug`.
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for rotated log files; logs go to stderr when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Paint tiles with 24-bit ANSI colors.
    #[arg(long)]
    color: bool,
}

/// Entry point for the Tile Merge command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let file_config = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(args, file_config);

    let _logger = logging::init(&settings.log_level, settings.log_dir.as_deref())?;
    log::info!("starting with seed {}", settings.seed);

    let store = FileStore::open(&settings.store_path).with_context(|| {
        format!(
            "failed to open score store at {}",
            settings.store_path.display()
        )
    })?;
    log::info!("scores are kept in {}", store.path().display());
    let leaderboard = Leaderboard::load(store);

    let mut session = GameSession::new(
        settings.grid_side,
        settings.difficulty,
        settings.seed,
        leaderboard,
    )?;

    let presentation = Presentation::new(
        WINDOW_TITLE,
        Color::from_rgb_u8(187, 173, 160),
        session.scene(),
    );
    let backend = TerminalBackend::new(io::stdin().lock(), io::stdout().lock(), settings.color);
    backend.run(presentation, move |input, scene| {
        session.update_scene(input, scene);
    })
}
