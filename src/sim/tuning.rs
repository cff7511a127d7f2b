//! Data-driven game balance
//!
//! Every field has a default, so a partial JSON override only needs the
//! values being changed.

use serde::{Deserialize, Serialize};

/// Balance values read by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Swing cadence ===
    /// Minimum gap between chops with no Quicker Axe levels
    pub base_cooldown_ms: u64,
    /// Cooldown removed per Quicker Axe level
    pub cooldown_step_ms: u64,
    /// Cooldown never drops below this
    pub min_cooldown_ms: u64,
    /// Chops closer than this add 2 combo instead of 1
    pub combo_window_ms: u64,

    // === Damage ===
    pub base_damage: f32,
    pub damage_per_power_level: f32,
    pub double_chop_base_chance: f32,
    pub double_chop_chance_per_level: f32,

    // === Loot ===
    pub lucky_chance_per_level: f32,
    pub lucky_bonus_wood: u64,

    // === Over-time effects ===
    /// One combo point is lost per interval
    pub combo_decay_interval_ms: u64,
    /// Stronger Arms damage per level per 100ms
    pub auto_chop_rate: f32,
    pub fire_interval_ms: u64,
    pub fire_burn_per_level: f32,
    /// How long auto-chop and burn keep working after a chop
    pub effect_window_ms: u64,

    // === Quotes ===
    pub quote_chance: f32,
    pub quote_life_ms: u64,
    /// A quote is always spoken on multiples of these chop counts
    pub quote_every_chops: Vec<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_cooldown_ms: 360,
            cooldown_step_ms: 22,
            min_cooldown_ms: 80,
            combo_window_ms: 450,

            base_damage: 10.0,
            damage_per_power_level: 2.4,
            double_chop_base_chance: 0.15,
            double_chop_chance_per_level: 0.03,

            lucky_chance_per_level: 0.06,
            lucky_bonus_wood: 8,

            combo_decay_interval_ms: 700,
            auto_chop_rate: 0.32,
            fire_interval_ms: 350,
            fire_burn_per_level: 0.9,
            effect_window_ms: 3000,

            quote_chance: 0.08,
            quote_life_ms: 3900,
            quote_every_chops: vec![10, 25, 50],
        }
    }
}

impl Tuning {
    /// Storage key for a saved balance override
    pub const STORAGE_KEY: &'static str = "timber_tap_tuning";

    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Minimum gap between accepted chops at the given Quicker Axe level
    pub fn min_chop_interval_ms(&self, axe_speed_level: u32) -> u64 {
        let reduction = self.cooldown_step_ms.saturating_mul(axe_speed_level as u64);
        self.base_cooldown_ms
            .saturating_sub(reduction)
            .max(self.min_cooldown_ms)
    }

    /// Damage of a single (non-doubled) chop
    pub fn chop_damage(&self, axe_power_level: u32) -> f32 {
        self.base_damage + axe_power_level as f32 * self.damage_per_power_level
    }

    /// Chance a chop lands twice. Zero without Double Chop levels.
    pub fn double_chop_chance(&self, level: u32) -> f32 {
        if level == 0 {
            0.0
        } else {
            self.double_chop_base_chance + level as f32 * self.double_chop_chance_per_level
        }
    }

    pub fn lucky_chance(&self, level: u32) -> f32 {
        level as f32 * self.lucky_chance_per_level
    }

    /// Stronger Arms damage over `delta_ms`
    pub fn auto_chop_damage(&self, level: u32, delta_ms: u64) -> f32 {
        level as f32 * self.auto_chop_rate * (delta_ms as f32 / 100.0)
    }

    pub fn fire_burn(&self, level: u32) -> f32 {
        level as f32 * self.fire_burn_per_level
    }
}
