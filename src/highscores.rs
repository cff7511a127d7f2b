//! Retired-run leaderboard
//!
//! Persisted through the key-value store, tracks the top 10 runs by wood
//! banked at retirement.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, PersistenceError, load_or_default, save_json};

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single retired run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Wood banked when the run was retired
    pub wood: u64,
    /// Wave reached
    pub wave: u32,
    /// Chops in the run
    pub chops: u64,
    /// Unix timestamp (ms) when retired
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// Wood first, then wave breaks ties
    fn beats(&self, other: &HighScoreEntry) -> bool {
        (self.wood, self.wave) > (other.wood, other.wave)
    }
}

/// Retired-run leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub const STORAGE_KEY: &'static str = "timber_tap_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a run would make the leaderboard
    pub fn qualifies(&self, wood: u64, wave: u32) -> bool {
        self.potential_rank(wood, wave).is_some()
    }

    /// Rank a run would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, wood: u64, wave: u32) -> Option<usize> {
        if wood == 0 {
            return None;
        }
        let probe = HighScoreEntry {
            wood,
            wave,
            chops: 0,
            timestamp: 0.0,
        };
        let pos = self
            .entries
            .iter()
            .position(|e| probe.beats(e))
            .unwrap_or(self.entries.len());
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Record a retired run. Returns the rank achieved (1-indexed) or None
    /// if it didn't qualify.
    pub fn add_run(&mut self, wood: u64, wave: u32, chops: u64, timestamp: f64) -> Option<usize> {
        let rank = self.potential_rank(wood, wave)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                wood,
                wave,
                chops,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best run (if any)
    pub fn top(&self) -> Option<&HighScoreEntry> {
        self.entries.first()
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        let scores: Self = load_or_default(store, Self::STORAGE_KEY);
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
