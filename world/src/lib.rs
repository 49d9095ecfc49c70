#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Tile Merge.

mod grid;

pub use grid::Grid;

use tile_merge_core::{
    Command, Difficulty, Event, GameStatus, InvalidArgument, ShiftRejection, DEFAULT_GRID_SIDE,
};

/// Represents the authoritative Tile Merge world state.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    difficulty: Difficulty,
    has_announced_win: bool,
    over: bool,
}

impl World {
    /// Creates a world with an empty default-sized grid at medium difficulty.
    #[must_use]
    pub fn new() -> Self {
        Self::from_grid(Grid::blank(DEFAULT_GRID_SIDE), Difficulty::default())
    }

    /// Creates a world with an empty grid of the requested side length.
    pub fn with_side(side: usize) -> Result<Self, InvalidArgument> {
        Ok(Self::from_grid(Grid::new(side)?, Difficulty::default()))
    }

    /// Resumes play on an existing grid.
    ///
    /// The win flag starts cleared, so a restored board that already holds the
    /// winning tile announces the win after its next shift.
    #[must_use]
    pub fn from_grid(grid: Grid, difficulty: Difficulty) -> Self {
        Self {
            grid,
            difficulty,
            has_announced_win: false,
            over: false,
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NewGame { difficulty } => {
            let side = world.grid.side();
            world.grid = Grid::blank(side);
            world.difficulty = difficulty;
            world.has_announced_win = false;
            world.over = false;
            log::info!("new {difficulty} game on a {side}x{side} grid");
            out_events.push(Event::GameStarted { difficulty, side });
        }
        Command::Shift { direction } => {
            if world.over {
                out_events.push(Event::ShiftRejected {
                    direction,
                    reason: ShiftRejection::GameOver,
                });
                return;
            }

            let outcome = world.grid.shift(direction);
            if outcome.moved {
                log::debug!(
                    "shifted {direction}: +{} (score {})",
                    outcome.score_gained,
                    world.grid.score()
                );
                out_events.push(Event::TilesShifted {
                    direction,
                    score_gained: outcome.score_gained,
                    score: world.grid.score(),
                });
            } else {
                out_events.push(Event::ShiftRejected {
                    direction,
                    reason: ShiftRejection::NoMovement,
                });
            }
        }
        Command::PlaceTile { cell, value } => match world.grid.place(cell, value) {
            Ok(()) => out_events.push(Event::TilePlaced { cell, value }),
            Err(reason) => {
                log::warn!("rejected tile {value} at {cell}: {reason:?}");
                out_events.push(Event::TilePlacementRejected {
                    cell,
                    value,
                    reason,
                });
            }
        },
        Command::DeclareStatus { status } => match status {
            GameStatus::Playing => {}
            GameStatus::Won => {
                if !world.has_announced_win {
                    world.has_announced_win = true;
                    log::info!("winning tile reached with score {}", world.grid.score());
                    out_events.push(Event::GameWon {
                        score: world.grid.score(),
                    });
                }
            }
            GameStatus::Over => {
                if !world.over {
                    world.over = true;
                    log::info!("game over with score {}", world.grid.score());
                    out_events.push(Event::GameOver {
                        score: world.grid.score(),
                    });
                }
            }
        },
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Grid, World};
    use tile_merge_core::{BoardView, Difficulty, DifficultySettings};

    /// Captures a read-only view of the tiles and score.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView<'_> {
        world.grid.view()
    }

    /// Provides read-only access to the authoritative grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Score accumulated in the current game.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.grid.score()
    }

    /// Difficulty of the current game.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Spawn rates and winning tile of the current game.
    #[must_use]
    pub fn settings(world: &World) -> DifficultySettings {
        world.difficulty.settings()
    }

    /// Reports whether the win was already announced in this game.
    #[must_use]
    pub fn has_announced_win(world: &World) -> bool {
        world.has_announced_win
    }

    /// Reports whether the game ended and rejects further shifts.
    #[must_use]
    pub fn is_over(world: &World) -> bool {
        world.over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_merge_core::{CellCoord, Direction, PlacementError};

    fn world_with(cells: Vec<u32>) -> World {
        let grid = Grid::from_cells(4, cells, 0).expect("valid grid");
        World::from_grid(grid, Difficulty::Medium)
    }

    #[test]
    fn new_game_clears_grid_and_flags() {
        let mut world = world_with(vec![2; 16]);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DeclareStatus {
                status: GameStatus::Over,
            },
            &mut events,
        );
        assert!(query::is_over(&world));

        events.clear();
        apply(
            &mut world,
            Command::NewGame {
                difficulty: Difficulty::Hard,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::GameStarted {
                difficulty: Difficulty::Hard,
                side: 4,
            }]
        );
        assert!(!query::is_over(&world));
        assert!(!query::has_announced_win(&world));
        assert_eq!(query::score(&world), 0);
        assert!(query::board_view(&world).cells().iter().all(|value| *value == 0));
        assert_eq!(query::difficulty(&world), Difficulty::Hard);
    }

    #[test]
    fn shift_without_movement_is_rejected() {
        let mut cells = vec![0; 16];
        cells[0] = 2;
        let mut world = world_with(cells);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Shift {
                direction: Direction::Left,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ShiftRejected {
                direction: Direction::Left,
                reason: ShiftRejection::NoMovement,
            }]
        );
    }

    #[test]
    fn shift_reports_score_gain() {
        let mut cells = vec![0; 16];
        cells[0] = 8;
        cells[1] = 8;
        let mut world = world_with(cells);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Shift {
                direction: Direction::Right,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TilesShifted {
                direction: Direction::Right,
                score_gained: 16,
                score: 16,
            }]
        );
    }

    #[test]
    fn shifts_are_rejected_once_the_game_is_over() {
        let mut cells = vec![0; 16];
        cells[1] = 2;
        let mut world = world_with(cells);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DeclareStatus {
                status: GameStatus::Over,
            },
            &mut events,
        );
        events.clear();
        apply(
            &mut world,
            Command::Shift {
                direction: Direction::Left,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::ShiftRejected {
                direction: Direction::Left,
                reason: ShiftRejection::GameOver,
            }]
        );
        assert_eq!(query::board_view(&world).cells()[1], 2);
    }

    #[test]
    fn win_is_announced_once() {
        let mut world = World::new();
        let mut events = Vec::new();
        for _ in 0..2 {
            apply(
                &mut world,
                Command::DeclareStatus {
                    status: GameStatus::Won,
                },
                &mut events,
            );
        }

        assert_eq!(events, vec![Event::GameWon { score: 0 }]);
        assert!(query::has_announced_win(&world));
        assert!(!query::is_over(&world));
    }

    #[test]
    fn placement_rejection_is_reported() {
        let mut cells = vec![0; 16];
        cells[5] = 4;
        let mut world = world_with(cells);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceTile {
                cell: CellCoord::new(1, 1),
                value: 2,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::TilePlacementRejected {
                cell: CellCoord::new(1, 1),
                value: 2,
                reason: PlacementError::Occupied,
            }]
        );
    }

    #[test]
    fn with_side_validates_range() {
        assert!(World::with_side(1).is_err());
        let world = World::with_side(6).expect("six is supported");
        assert_eq!(query::board_view(&world).side(), 6);
    }
}
