//! Lifetime progress snapshot

use serde::{Deserialize, Serialize};

use super::{KeyValueStore, PersistenceError, load_or_default, save_json};
use crate::sim::achievements::update_achievements;
use crate::sim::{GameState, UpgradeLevels};

/// The persisted subset of `GameState`. Everything else is per-session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedProgress {
    pub high_score: u64,
    pub total_wood: u64,
    pub wood: u64,
    pub best_combo: u32,
    pub best_run_wood: u64,
    #[serde(flatten)]
    pub upgrades: UpgradeLevels,
}

impl SavedProgress {
    pub const STORAGE_KEY: &'static str = "timber_tap_progress";

    pub fn from_state(state: &GameState) -> Self {
        Self {
            high_score: state.high_score,
            total_wood: state.total_wood_chopped,
            wood: state.wood,
            best_combo: state.best_combo,
            best_run_wood: state.best_run_wood,
            upgrades: state.upgrades,
        }
    }

    /// Merge onto a state and re-evaluate achievements against the
    /// restored totals
    pub fn apply_to(&self, state: &mut GameState) {
        state.wood = self.wood;
        state.total_wood_chopped = self.total_wood;
        state.high_score = self.high_score.max(self.total_wood);
        state.best_combo = self.best_combo;
        state.best_run_wood = self.best_run_wood;
        state.upgrades = self.upgrades;
        update_achievements(state);
    }

    /// Fresh state carrying the saved progress
    pub fn into_state(self) -> GameState {
        let mut state = GameState::new();
        self.apply_to(&mut state);
        state
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        let progress: Self = load_or_default(store, Self::STORAGE_KEY);
        log::info!(
            "Loaded progress: {} wood banked, {} lifetime",
            progress.wood,
            progress.total_wood
        );
        progress
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        save_json(store, Self::STORAGE_KEY, self)
    }
}
