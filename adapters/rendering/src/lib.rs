#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tile Merge adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use tile_merge_core::{BoardView, Difficulty, Direction, LeaderboardEntry};

/// Minimum pointer travel, in screen units, before a drag counts as a swipe.
pub const SWIPE_THRESHOLD: f32 = 20.0;

/// Text shown in place of an empty leaderboard.
pub const NO_RECORDS: &str = "No records yet";

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts the color channels back to bytes, ignoring alpha.
    #[must_use]
    pub fn to_rgb_u8(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
            .map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Background color of a tile holding `value`; `0` is an empty cell.
///
/// Values beyond 2048 share the darkest shade.
#[must_use]
pub fn tile_color(value: u32) -> Color {
    match value {
        0 => Color::from_rgb_u8(205, 193, 180),
        2 => Color::from_rgb_u8(238, 228, 218),
        4 => Color::from_rgb_u8(237, 224, 200),
        8 => Color::from_rgb_u8(242, 177, 121),
        16 => Color::from_rgb_u8(245, 149, 99),
        32 => Color::from_rgb_u8(246, 124, 95),
        64 => Color::from_rgb_u8(246, 94, 59),
        128 => Color::from_rgb_u8(237, 207, 114),
        256 => Color::from_rgb_u8(237, 204, 97),
        512 => Color::from_rgb_u8(237, 200, 80),
        1024 => Color::from_rgb_u8(237, 197, 63),
        2048 => Color::from_rgb_u8(237, 194, 46),
        _ => Color::from_rgb_u8(60, 58, 50),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Direction requested by a key press or swipe on this frame.
    pub direction: Option<Direction>,
    /// Whether the player asked to restart the current difficulty.
    pub new_game: bool,
    /// Difficulty the player switched to; switching restarts the game.
    pub difficulty: Option<Difficulty>,
    /// Difficulty whose leaderboard should be displayed.
    pub show_leaderboard: Option<Difficulty>,
    /// Answer to a pending name request; an empty answer declines the entry.
    pub name_entry: Option<String>,
    /// Whether the player asked to leave.
    pub quit: bool,
}

impl FrameInput {
    /// Creates an input frame carrying only a direction.
    #[must_use]
    pub fn shift(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Self::default()
        }
    }
}

/// Maps a keyboard key name onto a shift direction.
///
/// Accepts the DOM arrow key names and the `w`/`a`/`s`/`d` cluster.
#[must_use]
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Resolves a pointer drag from `start` to `end` into a shift direction.
///
/// The dominant axis wins; screen `y` grows downwards. Drags that do not
/// exceed [`SWIPE_THRESHOLD`] along the dominant axis are ignored.
#[must_use]
pub fn resolve_swipe(start: Vec2, end: Vec2) -> Option<Direction> {
    let delta = end - start;

    if delta.x.abs() > delta.y.abs() {
        if delta.x > SWIPE_THRESHOLD {
            Some(Direction::Right)
        } else if delta.x < -SWIPE_THRESHOLD {
            Some(Direction::Left)
        } else {
            None
        }
    } else if delta.y > SWIPE_THRESHOLD {
        Some(Direction::Down)
    } else if delta.y < -SWIPE_THRESHOLD {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Overlay announcing a notable game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// The winning tile appeared; play may continue.
    Won,
    /// No shift can change the board any more.
    Over,
}

impl Banner {
    /// Text displayed by the overlay.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Won => "You win!",
            Self::Over => "Game over!",
        }
    }
}

/// Single row of a rendered leaderboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LeaderboardRow {
    /// Stand-in row displayed when no record exists.
    Placeholder,
    /// Recorded score with its 1-based rank.
    Ranked {
        /// Position in the leaderboard, starting at 1.
        rank: usize,
        /// Recorded entry.
        entry: LeaderboardEntry,
    },
}

/// Leaderboard of one difficulty prepared for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardPresentation {
    /// Difficulty the records belong to.
    pub difficulty: Difficulty,
    /// Rows in display order; never empty.
    pub rows: Vec<LeaderboardRow>,
}

impl LeaderboardPresentation {
    /// Builds display rows from ordered `entries`.
    #[must_use]
    pub fn from_entries(difficulty: Difficulty, entries: &[LeaderboardEntry]) -> Self {
        let rows = if entries.is_empty() {
            vec![LeaderboardRow::Placeholder]
        } else {
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| LeaderboardRow::Ranked {
                    rank: index + 1,
                    entry: entry.clone(),
                })
                .collect()
        };

        Self { difficulty, rows }
    }
}

/// Deferred request for the player's name after a game ends or is won.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameRequest {
    /// Score that will be recorded.
    pub score: u64,
    /// Difficulty the score was reached on.
    pub difficulty: Difficulty,
    /// Name offered when the player accepts the default.
    pub suggested: String,
}

/// Scene description of the board and the surrounding panels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Number of cells along each side of the board.
    pub side: usize,
    /// Row-major tile values; `0` marks an empty cell.
    pub cells: Vec<u32>,
    /// Current score.
    pub score: u64,
    /// Best score ever reached.
    pub best_score: u64,
    /// Active difficulty.
    pub difficulty: Difficulty,
    /// Overlay shown above the board.
    pub banner: Option<Banner>,
    /// Leaderboard shown below the board.
    pub leaderboard: Option<LeaderboardPresentation>,
    /// Name prompt the backend should present after drawing the frame.
    pub name_request: Option<NameRequest>,
    /// One-line status text such as a recorded rank or a game-over hint.
    pub notice: Option<String>,
    /// Set once the session asked the backend to stop.
    pub exit_requested: bool,
}

impl Scene {
    /// Creates a scene showing `board` with no overlay or panel.
    #[must_use]
    pub fn new(board: BoardView<'_>, best_score: u64, difficulty: Difficulty) -> Self {
        Self {
            side: board.side(),
            cells: board.cells().to_vec(),
            score: board.score(),
            best_score,
            difficulty,
            banner: None,
            leaderboard: None,
            name_request: None,
            notice: None,
            exit_requested: false,
        }
    }

    /// Iterates the board one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.side.max(1))
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown by the backend.
    pub window_title: String,
    /// Color drawn behind the board.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tile Merge scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until the scene requests an exit or input ends.
    ///
    /// The provided `update_scene` closure receives the input captured for one
    /// frame and updates the scene before it is rendered. The backend must not
    /// gather the next frame until the previous update returned.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipes_pick_the_dominant_axis() {
        let origin = Vec2::new(100.0, 100.0);
        assert_eq!(
            resolve_swipe(origin, Vec2::new(140.0, 110.0)),
            Some(Direction::Right)
        );
        assert_eq!(
            resolve_swipe(origin, Vec2::new(60.0, 90.0)),
            Some(Direction::Left)
        );
        assert_eq!(
            resolve_swipe(origin, Vec2::new(95.0, 150.0)),
            Some(Direction::Down)
        );
        assert_eq!(
            resolve_swipe(origin, Vec2::new(110.0, 30.0)),
            Some(Direction::Up)
        );
    }

    #[test]
    fn short_swipes_are_ignored() {
        let origin = Vec2::ZERO;
        assert_eq!(resolve_swipe(origin, Vec2::new(20.0, 0.0)), None);
        assert_eq!(resolve_swipe(origin, Vec2::new(0.0, -19.5)), None);
        assert_eq!(resolve_swipe(origin, Vec2::new(15.0, 15.0)), None);
    }

    #[test]
    fn diagonal_ties_resolve_vertically() {
        assert_eq!(
            resolve_swipe(Vec2::ZERO, Vec2::new(30.0, 30.0)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn keys_map_to_directions() {
        assert_eq!(direction_for_key("ArrowUp"), Some(Direction::Up));
        assert_eq!(direction_for_key("ArrowRight"), Some(Direction::Right));
        assert_eq!(direction_for_key("a"), Some(Direction::Left));
        assert_eq!(direction_for_key("S"), Some(Direction::Down));
        assert_eq!(direction_for_key("Enter"), None);
    }

    #[test]
    fn empty_leaderboard_renders_placeholder() {
        let presentation = LeaderboardPresentation::from_entries(Difficulty::Hard, &[]);
        assert_eq!(presentation.rows, vec![LeaderboardRow::Placeholder]);
    }

    #[test]
    fn leaderboard_rows_are_ranked_from_one() {
        let entries = vec![
            LeaderboardEntry {
                name: "Ada".to_owned(),
                score: 900,
                date: "2024-02-02".to_owned(),
            },
            LeaderboardEntry {
                name: "Lin".to_owned(),
                score: 400,
                date: "2024-02-03".to_owned(),
            },
        ];
        let presentation = LeaderboardPresentation::from_entries(Difficulty::Easy, &entries);
        let ranks: Vec<usize> = presentation
            .rows
            .iter()
            .filter_map(|row| match row {
                LeaderboardRow::Ranked { rank, .. } => Some(*rank),
                LeaderboardRow::Placeholder => None,
            })
            .collect();
        assert_eq!(ranks, vec![1, 2]);
    }

    #[test]
    fn scene_copies_the_board() {
        let cells = [2, 0, 0, 4];
        let scene = Scene::new(BoardView::new(&cells, 2, 12), 40, Difficulty::Medium);
        assert_eq!(scene.score, 12);
        assert_eq!(scene.best_score, 40);
        let rows: Vec<&[u32]> = scene.rows().collect();
        assert_eq!(rows, vec![&[2_u32, 0][..], &[0_u32, 4][..]]);
        assert!(scene.banner.is_none());
    }

    #[test]
    fn palette_round_trips_bytes() {
        assert_eq!(tile_color(2).to_rgb_u8(), [238, 228, 218]);
        assert_eq!(tile_color(4096), tile_color(8192));
    }
}
