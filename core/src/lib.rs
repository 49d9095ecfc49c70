#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tile Merge engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! [`BoardView`] snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of the square grid used when no other size is configured.
pub const DEFAULT_GRID_SIDE: usize = 4;

/// Smallest grid side length the engine accepts.
pub const MIN_GRID_SIDE: usize = 2;

/// Largest grid side length the engine accepts.
pub const MAX_GRID_SIDE: usize = 16;

/// Largest value a tile may hold. Two tiles of this value no longer merge.
pub const MAX_TILE_VALUE: u32 = 1 << 30;

/// Reports whether `value` may occupy a grid cell as a tile.
///
/// Tiles are powers of two from 2 up to [`MAX_TILE_VALUE`]. Zero marks an
/// empty cell and is therefore not a tile value.
#[must_use]
pub const fn is_tile_value(value: u32) -> bool {
    value >= 2 && value <= MAX_TILE_VALUE && value.is_power_of_two()
}

/// Value produced by merging two tiles of `value`.
///
/// Returns `None` once the result would exceed [`MAX_TILE_VALUE`], so such a
/// pair blocks like two different tiles.
#[must_use]
pub const fn merged_value(value: u32) -> Option<u32> {
    if value < MAX_TILE_VALUE {
        Some(value * 2)
    } else {
        None
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Clears the grid and score and starts a fresh game at the given difficulty.
    NewGame {
        /// Difficulty that governs spawn rates and the winning tile.
        difficulty: Difficulty,
    },
    /// Slides and merges every tile toward the wall named by the direction.
    Shift {
        /// Wall the tiles travel toward.
        direction: Direction,
    },
    /// Places a freshly spawned tile into an empty cell.
    PlaceTile {
        /// Cell that receives the tile.
        cell: CellCoord,
        /// Value written into the cell.
        value: u32,
    },
    /// Records the outcome of a status evaluation.
    DeclareStatus {
        /// Status determined for the current board.
        status: GameStatus,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that a new game started on an empty grid.
    GameStarted {
        /// Difficulty active for the new game.
        difficulty: Difficulty,
        /// Side length of the square grid.
        side: usize,
    },
    /// Confirms that a shift moved or merged at least one tile.
    TilesShifted {
        /// Direction the tiles travelled.
        direction: Direction,
        /// Points earned by merges during the shift.
        score_gained: u64,
        /// Total score after the shift.
        score: u64,
    },
    /// Reports that a shift request left the grid untouched.
    ShiftRejected {
        /// Direction requested by the adapter.
        direction: Direction,
        /// Reason the shift had no effect.
        reason: ShiftRejection,
    },
    /// Confirms that a tile was written into an empty cell.
    TilePlaced {
        /// Cell that received the tile.
        cell: CellCoord,
        /// Value of the placed tile.
        value: u32,
    },
    /// Reports that a tile placement request was rejected.
    TilePlacementRejected {
        /// Cell targeted by the request.
        cell: CellCoord,
        /// Value carried by the request.
        value: u32,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces the first time the winning tile appeared in this game.
    GameWon {
        /// Score at the moment the win was announced.
        score: u64,
    },
    /// Announces that no further shift can change the grid.
    GameOver {
        /// Final score of the game.
        score: u64,
    },
}

/// Reasons a shift request may leave the grid untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftRejection {
    /// Every line was already compacted toward the wall with nothing to merge.
    NoMovement,
    /// The game ended and only a new game accepts further input.
    GameOver,
}

/// Reasons a tile placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell already holds a tile.
    Occupied,
    /// The value is not a power of two of at least 2.
    InvalidValue,
}

/// Walls tiles can be shifted toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward row zero.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column zero.
    Left,
    /// Toward the last column.
    Right,
}

impl Direction {
    /// Every direction in a stable order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Lowercase name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| InvalidArgument::Direction(value.to_owned()))
    }
}

/// Named difficulty levels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Fewer large spawns and a 1024 winning tile.
    Easy,
    /// The standard game.
    #[default]
    Medium,
    /// Frequent large spawns and a 4096 winning tile.
    Hard,
}

impl Difficulty {
    /// Every difficulty in ascending order.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Lowercase name of the difficulty.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Spawn rates and winning tile for this difficulty.
    #[must_use]
    pub const fn settings(self) -> DifficultySettings {
        settings_for(self)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = InvalidArgument;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| InvalidArgument::Difficulty(value.to_owned()))
    }
}

/// Immutable tuning applied to a game by its difficulty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultySettings {
    spawn_rate_4: f64,
    spawn_rate_8: f64,
    win_tile: u32,
}

impl DifficultySettings {
    /// Probability that a spawned tile is a 4.
    #[must_use]
    pub const fn spawn_rate_4(&self) -> f64 {
        self.spawn_rate_4
    }

    /// Probability that a spawned tile is an 8.
    #[must_use]
    pub const fn spawn_rate_8(&self) -> f64 {
        self.spawn_rate_8
    }

    /// Tile value whose first appearance wins the game.
    #[must_use]
    pub const fn win_tile(&self) -> u32 {
        self.win_tile
    }
}

/// Looks up the spawn rates and winning tile for `difficulty`.
///
/// Whatever probability mass is not claimed by 4s and 8s spawns a 2.
#[must_use]
pub const fn settings_for(difficulty: Difficulty) -> DifficultySettings {
    match difficulty {
        Difficulty::Easy => DifficultySettings {
            spawn_rate_4: 0.1,
            spawn_rate_8: 0.0,
            win_tile: 1024,
        },
        Difficulty::Medium => DifficultySettings {
            spawn_rate_4: 0.2,
            spawn_rate_8: 0.05,
            win_tile: 2048,
        },
        Difficulty::Hard => DifficultySettings {
            spawn_rate_4: 0.3,
            spawn_rate_8: 0.1,
            win_tile: 4096,
        },
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Result of shifting the grid in one direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveOutcome {
    /// Whether any tile changed position or value.
    pub moved: bool,
    /// Sum of the values produced by merges.
    pub score_gained: u64,
}

/// Classification of the board after a shift that moved tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// The game continues.
    Playing,
    /// The winning tile appeared for the first time.
    Won,
    /// No empty cell and no adjacent equal pair remain.
    Over,
}

/// Single leaderboard record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Player name supplied at the end of the game.
    pub name: String,
    /// Score reached by the player.
    pub score: u64,
    /// Local date the score was recorded.
    pub date: String,
}

/// Read-only view over the tiles of a square grid.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a [u32],
    side: usize,
    score: u64,
}

impl<'a> BoardView<'a> {
    /// Captures a view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [u32], side: usize, score: u64) -> Self {
        debug_assert_eq!(cells.len(), side * side, "cell slice must cover the grid");
        Self { cells, side, score }
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Score accumulated by merges so far.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Value stored in the provided cell, or `None` when it lies outside the grid.
    #[must_use]
    pub fn value(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell).and_then(|index| self.cells.get(index).copied())
    }

    /// Row-major cell values, zero marking empty cells.
    #[must_use]
    pub fn cells(&self) -> &'a [u32] {
        self.cells
    }

    /// Iterator over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &'a [u32]> + 'a {
        self.cells.chunks(self.side.max(1))
    }

    /// Enumerates empty cells in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, value)| **value == 0)
            .map(|(index, _)| self.coord(index))
            .collect()
    }

    /// Reports whether at least one cell is empty.
    #[must_use]
    pub fn has_empty_cell(&self) -> bool {
        self.cells.contains(&0)
    }

    /// Reports whether any cell holds exactly `value`.
    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        self.cells.contains(&value)
    }

    /// Largest tile on the board, zero when the board is empty.
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    fn coord(&self, index: usize) -> CellCoord {
        let side = self.side.max(1);
        CellCoord::new((index % side) as u32, (index / side) as u32)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        if column < self.side && row < self.side {
            Some(row * self.side + column)
        } else {
            None
        }
    }
}

/// Programmer errors raised when malformed values cross into the engine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// The text does not name a direction.
    #[error("unknown direction '{0}' (expected up, down, left or right)")]
    Direction(String),
    /// The text does not name a difficulty.
    #[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
    Difficulty(String),
    /// The grid side lies outside the supported range.
    #[error("grid side {0} is outside the supported range 2..=16")]
    GridSide(usize),
    /// The cell buffer does not cover the grid exactly.
    #[error("expected {expected} cells for the grid but received {actual}")]
    CellCount {
        /// Number of cells the grid requires.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },
    /// A cell holds a value that cannot be a tile.
    #[error("value {value} at cell {cell} is not a power of two between 2 and 1073741824")]
    TileValue {
        /// Offending value.
        value: u32,
        /// Cell holding the value.
        cell: CellCoord,
    },
}
