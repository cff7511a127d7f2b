//! Game state and core simulation types
//!
//! `GameState` is the single source of truth handed to the renderer.
//! Engine bookkeeping (last chop time, id counter, accumulators) lives in
//! `ChopEngine`, not here, so two states compare equal when the game looks
//! the same.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::achievements::{Achievement, AchievementId, base_achievements};
use super::upgrades::UpgradeLevels;
use crate::consts::*;

/// Wave-derived modifier on tree health and wood yield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeasonEvent {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl SeasonEvent {
    /// Season for a wave. Checked winter first, then summer, then autumn.
    pub fn for_wave(wave: u32) -> Self {
        if wave % 12 == 0 {
            SeasonEvent::Winter
        } else if wave % 9 == 0 {
            SeasonEvent::Summer
        } else if wave % 6 == 0 {
            SeasonEvent::Autumn
        } else {
            SeasonEvent::Spring
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeasonEvent::Spring => "Spring",
            SeasonEvent::Summer => "Summer Heat",
            SeasonEvent::Autumn => "Autumn",
            SeasonEvent::Winter => "Frozen Logs",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SeasonEvent::Spring => "Regular sap flow, regular regret.",
            SeasonEvent::Summer => "Dry logs crack faster in the heat.",
            SeasonEvent::Autumn => "Dense grain, cozy suffering.",
            SeasonEvent::Winter => "Frozen logs resist axes and hope.",
        }
    }

    pub fn tree_health_multiplier(self) -> f32 {
        match self {
            SeasonEvent::Spring => 1.0,
            SeasonEvent::Summer => 0.9,
            SeasonEvent::Autumn => 1.1,
            SeasonEvent::Winter => 1.25,
        }
    }

    pub fn wood_multiplier(self) -> f32 {
        match self {
            SeasonEvent::Spring => 1.0,
            SeasonEvent::Summer => 1.15,
            SeasonEvent::Autumn => 1.05,
            SeasonEvent::Winter => 1.2,
        }
    }
}

/// Run-level state machine, derived from the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    /// Pre-game splash
    NotStarted,
    /// Chopping
    Running,
    /// Every-tenth-wave summary overlay
    WaveSummary,
    /// Run retired, game-over overlay showing
    GameOver,
}

/// A decaying wood chip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipParticle {
    pub id: u64,
    /// Offset from the impact point
    pub pos: Vec2,
    /// Per-frame velocity
    pub vel: Vec2,
    pub life_ms: u64,
}

/// Floating "-12" over the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageNumber {
    pub id: u64,
    pub amount: u32,
    /// Landed as a double chop
    pub doubled: bool,
    /// Vertical offset, grows negative as the number rises
    pub rise: f32,
    pub life_ms: u64,
}

/// Speech bubble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: u64,
    pub text: String,
    pub life_ms: u64,
}

/// Complete game state (serializable snapshot for the renderer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    // === Currency ===
    /// Spendable wood
    pub wood: u64,
    /// Lifetime wood earned (never decreases)
    pub total_wood_chopped: u64,
    /// Peak of total_wood_chopped
    pub high_score: u64,
    pub best_combo: u32,
    /// Largest wood bank seen during any run
    pub best_run_wood: u64,

    // === Run progress ===
    pub wave: u32,
    pub tree_health: f32,
    pub tree_max_health: f32,
    pub is_boss_tree: bool,
    pub season_event: SeasonEvent,

    // === Combat feedback ===
    /// Lifetime accepted chops
    pub chop_count: u64,
    /// Accepted chops this run
    pub run_chops: u64,
    /// Streak counter, 0..=MAX_COMBO
    pub combo: u32,

    // === Economy ===
    pub upgrades: UpgradeLevels,

    // === Transient visuals (renderer only) ===
    pub shake_strength: f32,
    /// 1.0 right after a chop, decays to 0
    pub swing_phase: f32,
    /// Swing sprite clock, 0 when idle
    pub anim_elapsed_ms: u64,
    pub background_scroll: f32,
    pub boss_banner_ms: u64,
    pub combo_burst_ms: u64,
    pub miss_flash_ms: u64,
    /// Bumped once per felled boss tree
    pub boss_defeat_pulse: u32,
    /// Stronger Arms damage window, restarted by each chop
    pub auto_chop_active_ms: u64,
    /// Fire Axe burn window, restarted by each chop
    pub fire_axe_active_ms: u64,
    pub chips: Vec<ChipParticle>,
    pub damage_numbers: Vec<DamageNumber>,
    pub quotes: Vec<Quote>,

    // === Session flags ===
    pub started: bool,
    pub show_summary: bool,
    pub show_game_over: bool,
    pub summary_wave: u32,
    pub summary_wood_gained: u64,
    pub summary_message: String,
    pub last_run_wave: u32,
    pub last_run_chops: u64,
    pub last_run_wood: u64,

    // === Daily challenge ===
    pub daily_challenge_progress: u32,
    pub daily_challenge_target: u32,
    pub daily_challenge_done: bool,

    pub achievements: Vec<Achievement>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Fresh state at app start: nothing earned, run not started
    pub fn new() -> Self {
        Self {
            wood: 0,
            total_wood_chopped: 0,
            high_score: 0,
            best_combo: 0,
            best_run_wood: 0,
            wave: 1,
            tree_health: INITIAL_TREE_HEALTH,
            tree_max_health: INITIAL_TREE_HEALTH,
            is_boss_tree: false,
            season_event: SeasonEvent::Spring,
            chop_count: 0,
            run_chops: 0,
            combo: 0,
            upgrades: UpgradeLevels::default(),
            shake_strength: 0.0,
            swing_phase: 0.0,
            anim_elapsed_ms: 0,
            background_scroll: 0.0,
            boss_banner_ms: 0,
            combo_burst_ms: 0,
            miss_flash_ms: 0,
            boss_defeat_pulse: 0,
            auto_chop_active_ms: 0,
            fire_axe_active_ms: 0,
            chips: Vec::new(),
            damage_numbers: Vec::new(),
            quotes: Vec::new(),
            started: false,
            show_summary: false,
            show_game_over: false,
            summary_wave: 0,
            summary_wood_gained: 0,
            summary_message: String::new(),
            last_run_wave: 0,
            last_run_chops: 0,
            last_run_wood: 0,
            daily_challenge_progress: 0,
            daily_challenge_target: DAILY_CHALLENGE_TARGET,
            daily_challenge_done: false,
            achievements: base_achievements(),
        }
    }

    /// Damage/reward multiplier from the current combo
    pub fn combo_multiplier(&self) -> f32 {
        1.0 + self.combo as f32 * COMBO_MULTIPLIER_STEP
    }

    pub fn phase(&self) -> RunPhase {
        if self.show_game_over {
            RunPhase::GameOver
        } else if !self.started {
            RunPhase::NotStarted
        } else if self.show_summary {
            RunPhase::WaveSummary
        } else {
            RunPhase::Running
        }
    }

    /// Accepting chops: started and no overlay showing
    pub fn is_running(&self) -> bool {
        self.phase() == RunPhase::Running
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.achievements.iter().any(|a| a.id == id && a.unlocked)
    }

    /// Newest speech bubble, if any is on screen
    pub fn displayed_quote(&self) -> Option<&str> {
        self.quotes.last().map(|q| q.text.as_str())
    }

    /// Remaining tree health in 0..=1
    pub fn health_fraction(&self) -> f32 {
        if self.tree_max_health <= 0.0 {
            0.0
        } else {
            (self.tree_health / self.tree_max_health).clamp(0.0, 1.0)
        }
    }

    /// Swing sprite frame for an animation with `frame_count` frames
    pub fn swing_frame(&self, frame_count: usize) -> usize {
        if frame_count == 0 {
            return 0;
        }
        let progress = self.anim_elapsed_ms.min(SWING_ANIM_TOTAL_MS) as f32
            / SWING_ANIM_TOTAL_MS as f32;
        ((progress * (frame_count - 1) as f32) as usize).min(frame_count - 1)
    }

    /// Fold a new combo value in, clamping and tracking the best
    pub(crate) fn set_combo(&mut self, combo: u32) {
        self.combo = combo.min(MAX_COMBO);
        self.best_combo = self.best_combo.max(self.combo);
    }

    /// Credit wood to bank, lifetime total and high score
    pub(crate) fn credit_wood(&mut self, amount: u64) {
        self.wood += amount;
        self.total_wood_chopped += amount;
        self.high_score = self.high_score.max(self.total_wood_chopped);
        self.best_run_wood = self.best_run_wood.max(self.wood);
    }
}

/// Health of the tree standing at `wave`
pub fn tree_health_for_wave(wave: u32) -> f32 {
    let boss = is_boss_wave(wave);
    let bonus = if boss { BOSS_BONUS_HEALTH } else { 0.0 };
    (TREE_BASE_HEALTH + wave as f32 * TREE_HEALTH_PER_WAVE + bonus)
        * SeasonEvent::for_wave(wave).tree_health_multiplier()
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave % BOSS_WAVE_INTERVAL == 0
}
