#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persisted per-difficulty leaderboards and the best score.
//!
//! Records live in a [`KeyValueStore`] under `leaderboard_<difficulty>` as JSON
//! arrays and under [`BEST_SCORE_KEY`] as a decimal integer. The leaderboard is
//! best-effort: unreadable values load as empty and failed writes are logged
//! while the in-memory state stays authoritative for the session.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tile_merge_core::{Difficulty, LeaderboardEntry};

/// Maximum number of records kept for each difficulty.
pub const MAX_ENTRIES: usize = 10;

/// Key holding the best score reached on any difficulty.
pub const BEST_SCORE_KEY: &str = "bestScore";

/// Key holding the serialized records of `difficulty`.
#[must_use]
pub fn leaderboard_key(difficulty: Difficulty) -> String {
    format!("leaderboard_{}", difficulty.as_str())
}

/// Failures reported by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not read or write its medium.
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// The backend could not encode its contents.
    #[error("storage encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// String key-value persistence consumed by the leaderboard.
pub trait KeyValueStore {
    /// Reads the value stored under `key`; absent keys yield `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Volatile store backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        let _ = self.values.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Ordered top scores per difficulty plus the best score, mirrored into a store.
#[derive(Debug)]
pub struct Leaderboard<S> {
    store: S,
    boards: BTreeMap<Difficulty, Vec<LeaderboardEntry>>,
    best_score: u64,
}

impl<S: KeyValueStore> Leaderboard<S> {
    /// Loads every difficulty and the best score from `store`.
    ///
    /// Missing or unreadable values are treated as empty.
    pub fn load(store: S) -> Self {
        let boards = Difficulty::ALL
            .into_iter()
            .map(|difficulty| (difficulty, load_entries(&store, difficulty)))
            .collect();
        let best_score = load_best_score(&store);

        Self {
            store,
            boards,
            best_score,
        }
    }

    /// Records a score dated with today's local date.
    ///
    /// Returns the 1-based rank of the new record, or `None` when it fell outside
    /// the kept entries.
    pub fn add_score(
        &mut self,
        difficulty: Difficulty,
        name: impl Into<String>,
        score: u64,
    ) -> Option<usize> {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        self.add_entry(
            difficulty,
            LeaderboardEntry {
                name: name.into(),
                score,
                date,
            },
        )
    }

    /// Records a fully formed entry.
    ///
    /// Entries are ordered by descending score; equal scores keep the order in
    /// which they were added. Only the best [`MAX_ENTRIES`] survive.
    pub fn add_entry(&mut self, difficulty: Difficulty, entry: LeaderboardEntry) -> Option<usize> {
        let score = entry.score;
        let entries = self.boards.entry(difficulty).or_default();
        entries.push(entry);
        let inserted = entries.len() - 1;

        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|left, right| entries[*right].score.cmp(&entries[*left].score));
        let rank = order
            .iter()
            .position(|index| *index == inserted)
            .filter(|position| *position < MAX_ENTRIES)
            .map(|position| position + 1);

        entries.sort_by(|left, right| right.score.cmp(&left.score));
        entries.truncate(MAX_ENTRIES);

        log::info!("recorded {score} points on {difficulty} (rank {rank:?})");
        self.persist_entries(difficulty);
        rank
    }

    /// Records for `difficulty`, best first.
    #[must_use]
    pub fn list(&self, difficulty: Difficulty) -> &[LeaderboardEntry] {
        self.boards
            .get(&difficulty)
            .map_or(&[][..], |entries| entries.as_slice())
    }

    /// Best score ever observed.
    #[must_use]
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Raises the best score to `score` when it is higher.
    ///
    /// Returns `true` when the best score changed.
    pub fn observe_score(&mut self, score: u64) -> bool {
        if score <= self.best_score {
            return false;
        }

        self.best_score = score;
        if let Err(error) = self.store.put(BEST_SCORE_KEY, score.to_string()) {
            log::warn!("could not persist best score {score}: {error}");
        }
        true
    }

    /// Provides read-only access to the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist_entries(&mut self, difficulty: Difficulty) {
        let key = leaderboard_key(difficulty);
        let result = serde_json::to_string(self.list(difficulty))
            .map_err(StoreError::from)
            .and_then(|json| self.store.put(&key, json));
        if let Err(error) = result {
            log::warn!("could not persist {key}: {error}");
        }
    }
}

fn load_entries<S: KeyValueStore>(store: &S, difficulty: Difficulty) -> Vec<LeaderboardEntry> {
    let key = leaderboard_key(difficulty);
    let raw = match store.get(&key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(error) => {
            log::warn!("could not read {key}: {error}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<LeaderboardEntry>>(&raw) {
        Ok(mut entries) => {
            entries.sort_by(|left, right| right.score.cmp(&left.score));
            entries.truncate(MAX_ENTRIES);
            entries
        }
        Err(error) => {
            log::warn!("discarding corrupt {key}: {error}");
            Vec::new()
        }
    }
}

fn load_best_score<S: KeyValueStore>(store: &S) -> u64 {
    match store.get(BEST_SCORE_KEY) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("discarding corrupt {BEST_SCORE_KEY}: {raw:?}");
            0
        }),
        Ok(None) => 0,
        Err(error) => {
            log::warn!("could not read {BEST_SCORE_KEY}: {error}");
            0
        }
    }
}
