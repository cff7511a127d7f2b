//! The chop engine
//!
//! Owns the only mutable bookkeeping the rules need (last accepted chop,
//! id counter, per-tick accumulators, RNG) and applies every transition to
//! a caller-owned `GameState`. Chop handling lives in `chop.rs`, time
//! advance in `tick.rs`.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::quotes::SUMMARY_QUOTES;
use super::state::{DamageNumber, GameState, SeasonEvent, is_boss_wave, tree_health_for_wave};
use super::tuning::Tuning;
use super::upgrades::UpgradeKind;
use crate::consts::*;

/// Where a hit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DamageSource {
    /// A player chop; counts toward the daily challenge
    Manual { doubled: bool },
    /// Stronger Arms damage over time
    AutoChop,
    /// Fire Axe burn
    Burn,
}

impl DamageSource {
    fn is_manual(self) -> bool {
        matches!(self, DamageSource::Manual { .. })
    }
}

/// A tree was felled and the next wave began
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WaveAdvance {
    pub wood_gained: u64,
    /// The felled tree was a boss
    pub boss_defeated: bool,
}

/// Gameplay rules plus the bookkeeping they need
pub struct ChopEngine<R: Rng = Pcg32> {
    pub(crate) tuning: Tuning,
    pub(crate) rng: R,
    /// Timestamp of the last accepted chop
    pub(crate) last_chop_ms: Option<u64>,
    next_id: u64,
    pub(crate) combo_decay_acc: u64,
    pub(crate) fire_acc: u64,
}

impl ChopEngine<Pcg32> {
    /// Engine with default tuning and a PCG stream seeded from `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::new(Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> ChopEngine<R> {
    pub fn new(rng: R) -> Self {
        Self::with_tuning(Tuning::default(), rng)
    }

    pub fn with_tuning(tuning: Tuning, rng: R) -> Self {
        Self {
            tuning,
            rng,
            last_chop_ms: None,
            next_id: 1,
            combo_decay_acc: 0,
            fire_acc: 0,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Allocate a new particle/number/quote id
    pub(crate) fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Leave the splash screen. Only works once, before any run.
    pub fn start(&mut self, state: &mut GameState) -> bool {
        if state.started || state.show_game_over {
            return false;
        }
        state.started = true;
        log::info!("Run started (wood bank {})", state.wood);
        true
    }

    pub fn dismiss_summary(&mut self, state: &mut GameState) -> bool {
        if !state.show_summary {
            return false;
        }
        state.show_summary = false;
        true
    }

    /// End the current run and show the game-over overlay.
    /// Lifetime aggregates are kept.
    pub fn retire(&mut self, state: &mut GameState) -> bool {
        if !state.started || state.show_game_over {
            return false;
        }
        state.show_game_over = true;
        state.show_summary = false;
        state.started = false;
        state.last_run_wave = state.wave;
        state.last_run_chops = state.run_chops;
        state.last_run_wood = state.wood;
        log::info!(
            "Run retired at wave {} ({} chops, {} wood)",
            state.wave,
            state.run_chops,
            state.wood
        );
        true
    }

    /// Start a fresh run, keeping lifetime aggregates, upgrades and
    /// achievements
    pub fn reset_run(&mut self, state: &mut GameState) {
        state.tree_health = INITIAL_TREE_HEALTH;
        state.tree_max_health = INITIAL_TREE_HEALTH;
        state.wave = 1;
        state.is_boss_tree = false;
        state.season_event = SeasonEvent::Spring;
        state.run_chops = 0;
        state.combo = 0;

        state.shake_strength = 0.0;
        state.swing_phase = 0.0;
        state.anim_elapsed_ms = 0;
        state.boss_banner_ms = 0;
        state.combo_burst_ms = 0;
        state.miss_flash_ms = 0;
        state.boss_defeat_pulse = 0;
        state.auto_chop_active_ms = 0;
        state.fire_axe_active_ms = 0;
        state.chips.clear();
        state.damage_numbers.clear();
        state.quotes.clear();

        state.show_summary = false;
        state.summary_wave = 0;
        state.summary_wood_gained = 0;
        state.summary_message.clear();
        state.show_game_over = false;
        state.started = true;

        self.last_chop_ms = None;
        self.combo_decay_acc = 0;
        self.fire_acc = 0;
        log::info!("Run restarted (wood bank {})", state.wood);
    }

    /// Spend wood on one level of `kind`. Returns false (state untouched)
    /// when the bank can't cover the price.
    pub fn buy_upgrade(&mut self, state: &mut GameState, kind: UpgradeKind) -> bool {
        let cost = state.upgrades.next_cost(kind);
        if state.wood < cost {
            return false;
        }
        state.wood -= cost;
        state.upgrades.increment(kind);
        log::debug!(
            "Bought {} level {} for {} wood",
            kind.key(),
            state.upgrades.level(kind),
            cost
        );
        true
    }

    /// String-keyed purchase for callers holding a storage/web key.
    /// Unknown keys are a no-op.
    pub fn buy_upgrade_by_key(&mut self, state: &mut GameState, key: &str) -> bool {
        match UpgradeKind::from_key(key) {
            Some(kind) => self.buy_upgrade(state, kind),
            None => false,
        }
    }

    /// Apply a hit to the current tree. When the tree would drop to zero it
    /// is felled and the next wave's tree replaces it in the same step.
    /// Callers re-evaluate achievements afterwards.
    pub(crate) fn apply_damage(
        &mut self,
        state: &mut GameState,
        raw_damage: f32,
        source: DamageSource,
    ) -> Option<WaveAdvance> {
        let damage = raw_damage * state.combo_multiplier();
        let remaining = state.tree_health - damage;
        if remaining > 0.0 {
            state.tree_health = remaining;
            if let DamageSource::Manual { doubled } = source {
                self.push_damage_number(state, damage, doubled);
            }
            return None;
        }

        let felled_boss = state.is_boss_tree;

        // Reward for the felled tree
        let base = if felled_boss { BOSS_REWARD } else { TREE_REWARD };
        let combo_bonus = (state.combo as f32 * COMBO_REWARD_FACTOR).floor() as u64;
        let lucky_chance = self.tuning.lucky_chance(state.upgrades.lucky_wood);
        let lucky_bonus = if lucky_chance > 0.0 && self.rng.random::<f32>() < lucky_chance {
            self.tuning.lucky_bonus_wood
        } else {
            0
        };
        let raw_reward = (base + combo_bonus + lucky_bonus) as f32;
        let wood_gained = ((raw_reward * state.season_event.wood_multiplier()).floor() as u64).max(1);

        // Next tree
        let new_wave = state.wave + 1;
        let boss = is_boss_wave(new_wave);
        state.wave = new_wave;
        state.is_boss_tree = boss;
        state.season_event = SeasonEvent::for_wave(new_wave);
        let health = tree_health_for_wave(new_wave);
        state.tree_health = health;
        state.tree_max_health = health;

        state.credit_wood(wood_gained);

        if source.is_manual() {
            state.daily_challenge_progress =
                (state.daily_challenge_progress + 1).min(state.daily_challenge_target);
        }
        state.daily_challenge_done = state.daily_challenge_progress >= state.daily_challenge_target;

        if boss {
            state.show_summary = true;
            state.summary_wave = new_wave;
            state.summary_wood_gained = wood_gained;
            state.summary_message = SUMMARY_QUOTES
                .choose(&mut self.rng)
                .map(|s| s.to_string())
                .unwrap_or_default();
            state.boss_banner_ms = BOSS_BANNER_MS;
            log::info!("Boss wave {} reached ({})", new_wave, state.season_event.label());
        } else {
            log::debug!(
                "Wave {} ({}), +{} wood",
                new_wave,
                state.season_event.label(),
                wood_gained
            );
        }

        let bump = if boss { BOSS_FELL_SHAKE } else { FELL_SHAKE };
        state.shake_strength = (state.shake_strength + bump).min(FELL_SHAKE_CAP);

        if felled_boss {
            state.boss_defeat_pulse += 1;
        }

        Some(WaveAdvance {
            wood_gained,
            boss_defeated: felled_boss,
        })
    }

    fn push_damage_number(&mut self, state: &mut GameState, damage: f32, doubled: bool) {
        let id = self.next_id();
        state.damage_numbers.push(DamageNumber {
            id,
            amount: damage.round().max(1.0) as u32,
            doubled,
            rise: 0.0,
            life_ms: DAMAGE_NUMBER_LIFE_MS,
        });
        if state.damage_numbers.len() > MAX_DAMAGE_NUMBERS {
            state.damage_numbers.remove(0);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::RngCore;

    /// RNG that always yields the same word: `FixedRng(0)` makes every
    /// probability roll succeed, `FixedRng(u32::MAX)` makes every roll fail.
    pub(crate) struct FixedRng(pub u32);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.0
        }

        fn next_u64(&mut self) -> u64 {
            ((self.0 as u64) << 32) | self.0 as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for (i, byte) in dest.iter_mut().enumerate() {
                *byte = self.0.to_le_bytes()[i % 4];
            }
        }
    }

    pub(crate) fn running_state() -> GameState {
        let mut state = GameState::new();
        state.started = true;
        state
    }

    #[test]
    fn test_damage_reduces_health() {
        let mut engine = ChopEngine::new(FixedRng(u32::MAX));
        let mut state = running_state();
        let advance = engine.apply_damage(&mut state, 10.0, DamageSource::AutoChop);
        assert!(advance.is_none());
        assert!((state.tree_health - 90.0).abs() < 0.001);
        // Only manual hits leave damage numbers
        assert!(state.damage_numbers.is_empty());
    }

    #[test]
    fn test_combo_scales_damage() {
        let mut engine = ChopEngine::new(FixedRng(u32::MAX));
        let mut state = running_state();
        state.combo = 20; // x2.0
        engine.apply_damage(&mut state, 10.0, DamageSource::Manual { doubled: false });
        assert!((state.tree_health - 80.0).abs() < 0.001);
        assert_eq!(state.damage_numbers.len(), 1);
        assert_eq!(state.damage_numbers[0].amount, 20);
    }

    #[test]
    fn test_felling_advances_wave() {
        let mut engine = ChopEngine::new(FixedRng(u32::MAX));
        let mut state = running_state();
        state.tree_health = 5.0;
        let advance = engine
            .apply_damage(&mut state, 10.0, DamageSource::Manual { doubled: false })
            .unwrap();
        assert_eq!(advance.wood_gained, TREE_REWARD);
        assert!(!advance.boss_defeated);
        assert_eq!(state.wave, 2);
        assert_eq!(state.wood, TREE_REWARD);
        assert_eq!(state.tree_health, state.tree_max_health);
        assert!((state.tree_health - 128.0).abs() < 0.001);
        assert_eq!(state.daily_challenge_progress, 1);
        assert!(state.shake_strength > 0.0);
    }

    #[test]
    fn test_reward_includes_combo_luck_and_season() {
        // Every roll succeeds: lucky bonus lands
        let mut engine = ChopEngine::new(FixedRng(0));
        let mut state = running_state();
        state.upgrades.lucky_wood = 1;
        state.combo = 10; // +2 wood
        state.season_event = SeasonEvent::Winter; // x1.2
        state.tree_health = 1.0;
        let advance = engine.apply_damage(&mut state, 10.0, DamageSource::AutoChop).unwrap();
        // (12 + 2 + 8) * 1.2 = 26.4
        assert_eq!(advance.wood_gained, 26);
        // Non-manual kills don't count toward the challenge
        assert_eq!(state.daily_challenge_progress, 0);
    }

    #[test]
    fn test_boss_wave_opens_summary() {
        let mut engine = ChopEngine::new(FixedRng(u32::MAX));
        let mut state = running_state();
        state.wave = 9;
        state.tree_health = 1.0;
        engine.apply_damage(&mut state, 10.0, DamageSource::Manual { doubled: false });
        assert_eq!(state.wave, 10);
        assert!(state.is_boss_tree);
        assert!(state.show_summary);
        assert_eq!(state.summary_wave, 10);
        assert!(!state.summary_message.is_empty());
        assert!(state.boss_banner_ms > 0);
        assert_eq!(state.boss_defeat_pulse, 0);

        // Felling the boss bumps the pulse
        state.show_summary = false;
        state.tree_health = 1.0;
        let advance = engine
            .apply_damage(&mut state, 10.0, DamageSource::Burn)
            .unwrap();
        assert!(advance.boss_defeated);
        assert_eq!(advance.wood_gained, BOSS_REWARD);
        assert_eq!(state.boss_defeat_pulse, 1);
        assert!(!state.is_boss_tree);
    }

    #[test]
    fn test_daily_challenge_completes_at_target() {
        let mut engine = ChopEngine::new(FixedRng(u32::MAX));
        let mut state = running_state();
        state.daily_challenge_progress = DAILY_CHALLENGE_TARGET - 1;
        state.tree_health = 1.0;
        engine.apply_damage(&mut state, 10.0, DamageSource::Manual { doubled: false });
        assert_eq!(state.daily_challenge_progress, DAILY_CHALLENGE_TARGET);
        assert!(state.daily_challenge_done);
        state.tree_health = 1.0;
        engine.apply_damage(&mut state, 10.0, DamageSource::Manual { doubled: false });
        assert_eq!(state.daily_challenge_progress, DAILY_CHALLENGE_TARGET);
    }

    #[test]
    fn test_buy_upgrade_scenario() {
        let mut engine = ChopEngine::seeded(1);
        let mut state = running_state();
        state.wood = 100;
        assert!(engine.buy_upgrade(&mut state, UpgradeKind::AxePower));
        assert_eq!(state.wood, 60);
        assert_eq!(state.upgrades.axe_power, 1);

        assert!(engine.buy_upgrade(&mut state, UpgradeKind::AxePower));
        assert_eq!(state.wood, 6);
        assert_eq!(state.upgrades.axe_power, 2);

        let before = state.clone();
        assert!(!engine.buy_upgrade(&mut state, UpgradeKind::AxePower));
        assert_eq!(state, before);
    }

    #[test]
    fn test_buy_unknown_key_is_noop() {
        let mut engine = ChopEngine::seeded(1);
        let mut state = running_state();
        state.wood = 1_000;
        let before = state.clone();
        assert!(!engine.buy_upgrade_by_key(&mut state, "chainsaw"));
        assert_eq!(state, before);
        assert!(engine.buy_upgrade_by_key(&mut state, "fire_axe"));
        assert_eq!(state.upgrades.fire_axe, 1);
        assert_eq!(state.wood, 910);
    }

    #[test]
    fn test_lifecycle_controls() {
        let mut engine = ChopEngine::seeded(7);
        let mut state = GameState::new();
        assert!(!engine.retire(&mut state));
        assert!(engine.start(&mut state));
        assert!(!engine.start(&mut state));

        state.wave = 14;
        state.run_chops = 80;
        state.wood = 300;
        state.total_wood_chopped = 900;
        state.high_score = 900;
        state.upgrades.axe_speed = 3;
        assert!(engine.retire(&mut state));
        assert!(state.show_game_over);
        assert!(!state.started);
        assert_eq!(state.last_run_wave, 14);
        assert_eq!(state.last_run_chops, 80);
        assert_eq!(state.last_run_wood, 300);
        assert!(!engine.retire(&mut state));
        // No going back to the splash from game over
        assert!(!engine.start(&mut state));

        engine.reset_run(&mut state);
        assert_eq!(state.wave, 1);
        assert!(state.started);
        assert!(!state.show_game_over);
        assert_eq!(state.run_chops, 0);
        assert_eq!(state.wood, 300);
        assert_eq!(state.total_wood_chopped, 900);
        assert_eq!(state.high_score, 900);
        assert_eq!(state.upgrades.axe_speed, 3);
        assert_eq!(state.last_run_wave, 14);
    }

    #[test]
    fn test_dismiss_summary() {
        let mut engine = ChopEngine::seeded(7);
        let mut state = running_state();
        assert!(!engine.dismiss_summary(&mut state));
        state.show_summary = true;
        assert!(engine.dismiss_summary(&mut state));
        assert!(!state.show_summary);
    }
}
