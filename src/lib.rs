//! Timber Tap - a tap-to-chop idle game
//!
//! Core modules:
//! - `sim`: Deterministic gameplay engine (chops, ticks, waves, upgrades)
//! - `controller`: Presentation controller driving the engine and side effects
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Key-value save/load of lifetime progress
//! - `audio`: Sound cues derived from engine outcomes

pub mod audio;
pub mod controller;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use controller::GameController;
pub use highscores::HighScores;
pub use settings::Settings;

/// Game rule constants
pub mod consts {
    /// Fixed simulation step fed to `ChopEngine::tick` (~60 Hz)
    pub const TICK_MS: u64 = 16;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Hold-to-chop repeat interval while a press is held
    pub const HOLD_REPEAT_MS: u64 = 130;

    /// Every Nth wave is a boss tree (and shows the wave summary)
    pub const BOSS_WAVE_INTERVAL: u32 = 10;
    /// Tree health before the first wave advance
    pub const INITIAL_TREE_HEALTH: f32 = 100.0;
    pub const TREE_BASE_HEALTH: f32 = 100.0;
    pub const TREE_HEALTH_PER_WAVE: f32 = 14.0;
    pub const BOSS_BONUS_HEALTH: f32 = 220.0;

    /// Wood granted for felling a normal / boss tree (before combo, luck, season)
    pub const TREE_REWARD: u64 = 12;
    pub const BOSS_REWARD: u64 = 35;
    /// Fraction of combo added to the tree reward
    pub const COMBO_REWARD_FACTOR: f32 = 0.25;

    /// Combo is clamped to [0, MAX_COMBO]
    pub const MAX_COMBO: u32 = 100;
    /// Damage bonus per combo point
    pub const COMBO_MULTIPLIER_STEP: f32 = 0.05;
    /// Crossing this combo upward fires the combo-burst banner
    pub const COMBO_BURST_THRESHOLD: u32 = 20;

    /// Chops needed (without a miss) for the daily challenge
    pub const DAILY_CHALLENGE_TARGET: u32 = 500;

    /// Screen shake (strength units)
    pub const CHOP_SHAKE: f32 = 4.5;
    pub const CHOP_SHAKE_CAP: f32 = 16.0;
    pub const FELL_SHAKE: f32 = 6.0;
    pub const BOSS_FELL_SHAKE: f32 = 10.0;
    pub const FELL_SHAKE_CAP: f32 = 20.0;
    /// Shake lost per millisecond
    pub const SHAKE_DECAY_PER_MS: f32 = 0.05;
    /// Swing phase lost per millisecond (1.0 -> 0.0 in 200ms)
    pub const SWING_DECAY_PER_MS: f32 = 0.005;

    /// Banner / flash durations
    pub const BOSS_BANNER_MS: u64 = 1800;
    pub const COMBO_BURST_MS: u64 = 420;
    pub const MISS_FLASH_MS: u64 = 650;

    /// Swing sprite animation (frame selection only)
    pub const SWING_ANIM_TOTAL_MS: u64 = 480;
    pub const SWING_MIDPOINT_MS: u64 = SWING_ANIM_TOTAL_MS / 2;

    /// Wood chip particles
    pub const CHIPS_PER_CHOP: usize = 7;
    pub const CHIPS_PER_BOSS_CHOP: usize = 12;
    pub const CHIP_MIN_LIFE_MS: u64 = 280;
    pub const CHIP_MAX_LIFE_MS: u64 = 520;
    /// Vertical velocity gained per 16ms frame
    pub const CHIP_GRAVITY: f32 = 0.6;

    /// Floating damage numbers
    pub const MAX_DAMAGE_NUMBERS: usize = 8;
    pub const DAMAGE_NUMBER_LIFE_MS: u64 = 700;
    /// Upward drift per 16ms frame
    pub const DAMAGE_NUMBER_RISE: f32 = 0.9;

    /// Speech bubbles kept on screen at once
    pub const MAX_QUOTES: usize = 3;

    /// Background parallax scroll (units per ms, wraps at BACKGROUND_WRAP)
    pub const BACKGROUND_SCROLL_PER_MS: f32 = 0.03;
    pub const BACKGROUND_WRAP: f32 = 10_000.0;
}
