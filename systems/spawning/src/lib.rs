#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded spawning system responsible for emitting tile placement commands.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tile_merge_core::{BoardView, CellCoord, Command, DifficultySettings, Event};

/// Number of tiles placed onto the empty grid when a game starts.
pub const INITIAL_TILES: usize = 2;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }

    /// Seed that drives cell and value selection.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

/// Pure system that places new tiles after game starts and productive shifts.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the current board to emit placement commands.
    ///
    /// A started game receives [`INITIAL_TILES`] tiles and every shift that moved
    /// tiles receives one. Tiles requested within the same call never share a
    /// cell, and nothing is emitted once the board is full.
    pub fn handle(
        &mut self,
        events: &[Event],
        board: BoardView<'_>,
        settings: DifficultySettings,
        out: &mut Vec<Command>,
    ) {
        let requested: usize = events
            .iter()
            .map(|event| match event {
                Event::GameStarted { .. } => INITIAL_TILES,
                Event::TilesShifted { .. } => 1,
                _ => 0,
            })
            .sum();

        if requested == 0 {
            return;
        }

        let mut empty = board.empty_cells();
        for _ in 0..requested {
            let Some((cell, value)) = self.spawn(&mut empty, settings) else {
                log::debug!("no empty cell left for a spawned tile");
                break;
            };
            out.push(Command::PlaceTile { cell, value });
        }
    }

    /// Removes a uniformly chosen cell from `empty` and pairs it with a tile value.
    ///
    /// Returns `None` when `empty` holds no cells.
    pub fn spawn(
        &mut self,
        empty: &mut Vec<CellCoord>,
        settings: DifficultySettings,
    ) -> Option<(CellCoord, u32)> {
        if empty.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..empty.len());
        let cell = empty.swap_remove(index);
        let value = tile_value_for(self.rng.gen::<f64>(), settings);
        Some((cell, value))
    }
}

/// Maps a uniform roll in `[0, 1)` onto a spawned tile value.
///
/// The 8 band is tested first, then the 4 band; the rest of the range yields 2.
#[must_use]
pub fn tile_value_for(roll: f64, settings: DifficultySettings) -> u32 {
    if roll < settings.spawn_rate_8() {
        8
    } else if roll < settings.spawn_rate_8() + settings.spawn_rate_4() {
        4
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tile_merge_core::Difficulty;

    #[test]
    fn medium_rolls_fall_into_expected_bands() {
        let settings = Difficulty::Medium.settings();
        assert_eq!(tile_value_for(0.0, settings), 8);
        assert_eq!(tile_value_for(0.049, settings), 8);
        assert_eq!(tile_value_for(0.05, settings), 4);
        assert_eq!(tile_value_for(0.249, settings), 4);
        assert_eq!(tile_value_for(0.251, settings), 2);
        assert_eq!(tile_value_for(0.999, settings), 2);
    }

    #[test]
    fn easy_never_rolls_an_eight() {
        let settings = Difficulty::Easy.settings();
        assert_eq!(tile_value_for(0.0, settings), 4);
        assert_eq!(tile_value_for(0.099, settings), 4);
        assert_eq!(tile_value_for(0.1, settings), 2);
    }

    #[test]
    fn spawn_consumes_the_chosen_cell() {
        let mut spawning = Spawning::new(Config::new(7));
        let mut empty = vec![CellCoord::new(0, 0), CellCoord::new(1, 0)];
        let (first, _) = spawning
            .spawn(&mut empty, Difficulty::Hard.settings())
            .expect("cell available");
        let (second, _) = spawning
            .spawn(&mut empty, Difficulty::Hard.settings())
            .expect("cell available");

        assert_ne!(first, second);
        assert!(empty.is_empty());
        assert!(spawning
            .spawn(&mut empty, Difficulty::Hard.settings())
            .is_none());
    }

    #[test]
    fn observed_frequencies_track_difficulty_rates() {
        let settings = Difficulty::Medium.settings();
        let mut spawning = Spawning::new(Config::new(0x5eed));
        let draws: u32 = 20_000;
        let mut fours = 0_u32;
        let mut eights = 0_u32;

        for _ in 0..draws {
            let mut empty = vec![CellCoord::new(0, 0)];
            match spawning.spawn(&mut empty, settings) {
                Some((_, 4)) => fours += 1,
                Some((_, 8)) => eights += 1,
                _ => {}
            }
        }

        let four_rate = f64::from(fours) / f64::from(draws);
        let eight_rate = f64::from(eights) / f64::from(draws);
        assert!((four_rate - 0.2).abs() < 0.015, "4 rate {four_rate}");
        assert!((eight_rate - 0.05).abs() < 0.01, "8 rate {eight_rate}");
    }
}
