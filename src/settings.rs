//! Player preferences
//!
//! Persisted separately from progress under their own storage key.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, PersistenceError, load_or_default, save_json};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visual Effects ===
    /// Screen shake on chops and felled trees
    pub screen_shake: bool,
    /// Wood chips
    pub particles: bool,
    /// Floating damage numbers
    pub damage_numbers: bool,
    /// Speech bubbles
    pub quotes: bool,

    // === Feedback ===
    /// Vibrate on wave advance and misses (mobile web)
    pub haptics: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake, no miss flash)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_shake: true,
            particles: true,
            damage_numbers: true,
            quotes: true,

            haptics: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    pub const STORAGE_KEY: &'static str = "timber_tap_settings";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective miss flash (respects reduced_motion)
    pub fn effective_miss_flash(&self) -> bool {
        !self.reduced_motion
    }

    /// Gain applied to every sound cue
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    pub fn load(store: &dyn KeyValueStore) -> Self {
        load_or_default(store, Self::STORAGE_KEY)
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
