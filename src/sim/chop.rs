//! Chop resolution
//!
//! A chop is one swing at the tree: rate-limited by the axe cooldown, it
//! grants chip wood immediately, grows the combo and then hits the tree
//! through the shared damage resolution.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::achievements::{AchievementId, update_achievements};
use super::engine::{ChopEngine, DamageSource};
use super::quotes::CHOP_QUOTES;
use super::state::{ChipParticle, GameState, Quote};
use crate::consts::*;

/// Why a chop was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChopRejection {
    /// Splash or game-over screen
    NotRunning,
    /// Wave summary overlay is up
    OverlayShown,
    /// Swing still cooling down; counts as a miss for the caller
    TooFast { wait_ms: u64 },
}

/// What a chop did, for the caller's side effects
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChopOutcome {
    pub accepted: bool,
    pub rejection: Option<ChopRejection>,
    /// The Double Chop roll succeeded
    pub doubled: bool,
    /// Wood credited (chip wood plus any tree reward)
    pub wood_gained: u64,
    pub waves_advanced: u32,
    pub bosses_defeated: u32,
    pub quote_spoken: bool,
    pub unlocked: Vec<AchievementId>,
}

impl ChopOutcome {
    fn rejected(reason: ChopRejection) -> Self {
        Self {
            rejection: Some(reason),
            ..Default::default()
        }
    }

    /// Rejected by the cooldown while a run was active
    pub fn is_miss(&self) -> bool {
        matches!(self.rejection, Some(ChopRejection::TooFast { .. }))
    }
}

impl<R: Rng> ChopEngine<R> {
    /// Swing at the tree at wall-clock `now_ms`. A rejected chop leaves the
    /// state untouched.
    pub fn chop(&mut self, state: &mut GameState, now_ms: u64) -> ChopOutcome {
        if !state.started || state.show_game_over {
            return ChopOutcome::rejected(ChopRejection::NotRunning);
        }
        if state.show_summary {
            return ChopOutcome::rejected(ChopRejection::OverlayShown);
        }

        let min_gap = self.tuning.min_chop_interval_ms(state.upgrades.axe_speed);
        let elapsed = self
            .last_chop_ms
            .map(|last| now_ms as i64 - last as i64);
        if let Some(elapsed) = elapsed
            && elapsed > 0
            && (elapsed as u64) < min_gap
        {
            return ChopOutcome::rejected(ChopRejection::TooFast {
                wait_ms: min_gap - elapsed as u64,
            });
        }
        self.last_chop_ms = Some(now_ms);

        let mut outcome = ChopOutcome {
            accepted: true,
            ..Default::default()
        };

        let mut damage = self.tuning.chop_damage(state.upgrades.axe_power);
        let double_chance = self.tuning.double_chop_chance(state.upgrades.double_chop);
        if double_chance > 0.0 && self.rng.random::<f32>() < double_chance {
            damage *= 2.0;
            outcome.doubled = true;
        }

        // Chip wood lands on every chop, felled or not
        let chip_wood = (state.season_event.wood_multiplier().round() as u64).max(1);
        state.credit_wood(chip_wood);
        outcome.wood_gained += chip_wood;
        state.chop_count += 1;
        state.run_chops += 1;

        let quick = elapsed.is_some_and(|e| (0..=self.tuning.combo_window_ms as i64).contains(&e));
        let previous_combo = state.combo;
        state.set_combo(previous_combo + if quick { 2 } else { 1 });
        if previous_combo < COMBO_BURST_THRESHOLD && state.combo >= COMBO_BURST_THRESHOLD {
            state.combo_burst_ms = COMBO_BURST_MS;
        }

        state.swing_phase = 1.0;
        state.anim_elapsed_ms = 0;
        if state.upgrades.auto_chop > 0 {
            state.auto_chop_active_ms = self.tuning.effect_window_ms;
        }
        if state.upgrades.fire_axe > 0 {
            state.fire_axe_active_ms = self.tuning.effect_window_ms;
        }
        state.shake_strength = (state.shake_strength + CHOP_SHAKE).min(CHOP_SHAKE_CAP);

        if let Some(advance) = self.apply_damage(
            state,
            damage,
            DamageSource::Manual {
                doubled: outcome.doubled,
            },
        ) {
            outcome.wood_gained += advance.wood_gained;
            outcome.waves_advanced += 1;
            if advance.boss_defeated {
                outcome.bosses_defeated += 1;
            }
        }

        outcome.quote_spoken = self.maybe_speak(state);
        self.spawn_chips(state);
        outcome.unlocked = update_achievements(state);
        outcome
    }

    /// Punish a too-fast chop: combo and challenge streak are lost
    pub fn miss(&mut self, state: &mut GameState) {
        state.combo = 0;
        state.daily_challenge_progress = 0;
        state.daily_challenge_done = false;
        state.miss_flash_ms = MISS_FLASH_MS;
    }

    fn maybe_speak(&mut self, state: &mut GameState) -> bool {
        let scheduled = self
            .tuning
            .quote_every_chops
            .iter()
            .any(|&n| n > 0 && state.chop_count % n == 0);
        if !scheduled && self.rng.random::<f32>() >= self.tuning.quote_chance {
            return false;
        }
        let Some(text) = CHOP_QUOTES.choose(&mut self.rng) else {
            return false;
        };
        let id = self.next_id();
        state.quotes.push(Quote {
            id,
            text: text.to_string(),
            life_ms: self.tuning.quote_life_ms,
        });
        if state.quotes.len() > MAX_QUOTES {
            state.quotes.remove(0);
        }
        true
    }

    fn spawn_chips(&mut self, state: &mut GameState) {
        let count = if state.is_boss_tree {
            CHIPS_PER_BOSS_CHOP
        } else {
            CHIPS_PER_CHOP
        };
        let life_span = (CHIP_MAX_LIFE_MS - CHIP_MIN_LIFE_MS) as f32;
        for _ in 0..count {
            let vx = self.rng.random::<f32>() * 16.0 - 8.0;
            let vy = self.rng.random::<f32>() * -10.0;
            let life_ms = CHIP_MIN_LIFE_MS + (self.rng.random::<f32>() * life_span) as u64;
            let id = self.next_id();
            state.chips.push(ChipParticle {
                id,
                pos: Vec2::ZERO,
                vel: Vec2::new(vx, vy),
                life_ms,
            });
        }
    }
}
