//! Time advance
//!
//! Everything that happens without input: combo decay, the over-time
//! upgrade effects, timer countdowns and aging of chips, damage numbers and
//! quotes.

use rand::Rng;

use super::achievements::update_achievements;
use super::engine::{ChopEngine, DamageSource};
use super::state::GameState;
use crate::consts::*;

/// What a tick did, for the caller's side effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Trees felled by auto-chop or burn
    pub waves_advanced: u32,
    pub bosses_defeated: u32,
    /// The swing animation passed its impact frame
    pub swing_midpoint: bool,
}

impl<R: Rng> ChopEngine<R> {
    /// Advance the game by `delta_ms`. A zero delta changes nothing.
    pub fn tick(&mut self, state: &mut GameState, delta_ms: u64) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        if delta_ms == 0 {
            return outcome;
        }

        state.background_scroll =
            (state.background_scroll + delta_ms as f32 * BACKGROUND_SCROLL_PER_MS) % BACKGROUND_WRAP;

        // Splash, summary and game over only scroll the background
        if !state.is_running() {
            return outcome;
        }

        self.combo_decay_acc += delta_ms;
        let interval = self.tuning.combo_decay_interval_ms.max(1);
        while self.combo_decay_acc >= interval {
            self.combo_decay_acc -= interval;
            state.combo = state.combo.saturating_sub(1);
        }

        if state.auto_chop_active_ms > 0 && state.upgrades.auto_chop > 0 {
            let damage = self
                .tuning
                .auto_chop_damage(state.upgrades.auto_chop, delta_ms);
            if let Some(advance) = self.apply_damage(state, damage, DamageSource::AutoChop) {
                outcome.waves_advanced += 1;
                if advance.boss_defeated {
                    outcome.bosses_defeated += 1;
                }
            }
        }

        // A felled auto-chop tree may have opened the summary
        if state.is_running() && state.fire_axe_active_ms > 0 && state.upgrades.fire_axe > 0 {
            self.fire_acc += delta_ms;
            if self.fire_acc >= self.tuning.fire_interval_ms {
                self.fire_acc = 0;
                let burn = self.tuning.fire_burn(state.upgrades.fire_axe);
                if let Some(advance) = self.apply_damage(state, burn, DamageSource::Burn) {
                    outcome.waves_advanced += 1;
                    if advance.boss_defeated {
                        outcome.bosses_defeated += 1;
                    }
                }
            }
        }
        state.auto_chop_active_ms = state.auto_chop_active_ms.saturating_sub(delta_ms);
        state.fire_axe_active_ms = state.fire_axe_active_ms.saturating_sub(delta_ms);

        // Swing animation clock runs through the follow-through
        let anim_before = state.anim_elapsed_ms;
        if state.swing_phase > 0.0 || (anim_before > 0 && anim_before < SWING_ANIM_TOTAL_MS) {
            let anim_after = anim_before + delta_ms;
            outcome.swing_midpoint = anim_before < SWING_MIDPOINT_MS && anim_after >= SWING_MIDPOINT_MS;
            state.anim_elapsed_ms = if anim_after >= SWING_ANIM_TOTAL_MS {
                0
            } else {
                anim_after
            };
        }

        let dt = delta_ms as f32;
        state.shake_strength = (state.shake_strength - dt * SHAKE_DECAY_PER_MS).max(0.0);
        state.swing_phase = (state.swing_phase - dt * SWING_DECAY_PER_MS).max(0.0);
        state.boss_banner_ms = state.boss_banner_ms.saturating_sub(delta_ms);
        state.combo_burst_ms = state.combo_burst_ms.saturating_sub(delta_ms);
        state.miss_flash_ms = state.miss_flash_ms.saturating_sub(delta_ms);

        age_entities(state, delta_ms);

        if outcome.waves_advanced > 0 {
            update_achievements(state);
        }
        outcome
    }
}

/// Drop expired chips, numbers and quotes; move the survivors
fn age_entities(state: &mut GameState, delta_ms: u64) {
    let steps = delta_ms as f32 / TICK_MS as f32;

    state.chips.retain_mut(|chip| {
        if chip.life_ms <= delta_ms {
            return false;
        }
        chip.life_ms -= delta_ms;
        chip.pos += chip.vel * steps;
        chip.vel.y += CHIP_GRAVITY * steps;
        true
    });

    state.damage_numbers.retain_mut(|number| {
        if number.life_ms <= delta_ms {
            return false;
        }
        number.life_ms -= delta_ms;
        number.rise -= DAMAGE_NUMBER_RISE * steps;
        true
    });

    state.quotes.retain_mut(|quote| {
        if quote.life_ms <= delta_ms {
            return false;
        }
        quote.life_ms -= delta_ms;
        true
    });
}
