//! Presentation controller
//!
//! Owns the single `GameState`, applies every transition to it in call
//! order and performs the side effects the engine reports: sound cues,
//! progress saves, leaderboard entries. Also runs the fixed-step frame loop
//! and the hold-to-chop repeater.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::audio::{AudioSink, SoundCue};
use crate::consts::*;
use crate::highscores::HighScores;
use crate::persistence::{KeyValueStore, SavedProgress, save_json};
use crate::platform;
use crate::settings::Settings;
use crate::sim::{ChopEngine, ChopOutcome, GameState, TickOutcome, Tuning, UpgradeKind};

/// Longest frame gap fed to the simulation; longer stalls are dropped
pub const MAX_FRAME_MS: u64 = 100;

/// Per-frame presentation effects with the player's settings applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameFx {
    /// Screen shake offset, zero when shake is off
    pub shake: f32,
    pub miss_flash: bool,
    /// Remaining tree health in 0..=1
    pub health_fraction: f32,
}

pub struct GameController<S: KeyValueStore, A: AudioSink, R: Rng = Pcg32> {
    engine: ChopEngine<R>,
    state: GameState,
    store: S,
    audio: A,
    highscores: HighScores,
    settings: Settings,
    accumulator_ms: u64,
    last_frame_ms: Option<u64>,
    /// Next repeat time while the chop button is held
    hold_next_ms: Option<u64>,
}

impl<S: KeyValueStore, A: AudioSink> GameController<S, A> {
    /// Controller with a PCG engine seeded from `seed`, using the balance
    /// override saved in `store` if there is one
    pub fn seeded(seed: u64, store: S, audio: A) -> Self {
        let engine = ChopEngine::with_tuning(load_tuning(&store), Pcg32::seed_from_u64(seed));
        Self::new(engine, store, audio)
    }
}

/// Stored balance override, or the defaults when missing or malformed
fn load_tuning(store: &dyn KeyValueStore) -> Tuning {
    let json = match store.get(Tuning::STORAGE_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return Tuning::default(),
        Err(e) => {
            log::warn!("Failed to read tuning override: {e}");
            return Tuning::default();
        }
    };
    match Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Using stored tuning override");
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning override: {e}");
            Tuning::default()
        }
    }
}

impl<S: KeyValueStore, A: AudioSink, R: Rng> GameController<S, A, R> {
    /// Hydrate progress, leaderboard and settings from `store`
    pub fn new(engine: ChopEngine<R>, store: S, audio: A) -> Self {
        let state = SavedProgress::load(&store).into_state();
        let highscores = HighScores::load(&store);
        let settings = Settings::load(&store);
        Self {
            engine,
            state,
            store,
            audio,
            highscores,
            settings,
            accumulator_ms: 0,
            last_frame_ms: None,
            hold_next_ms: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn highscores(&self) -> &HighScores {
        &self.highscores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_holding(&self) -> bool {
        self.hold_next_ms.is_some()
    }

    pub fn frame_fx(&self) -> FrameFx {
        FrameFx {
            shake: if self.settings.effective_screen_shake() {
                self.state.shake_strength
            } else {
                0.0
            },
            miss_flash: self.state.miss_flash_ms > 0 && self.settings.effective_miss_flash(),
            health_fraction: self.state.health_fraction(),
        }
    }

    pub fn start(&mut self) -> bool {
        self.engine.start(&mut self.state)
    }

    /// Chop at `now_ms`. A too-fast chop during a run counts as a miss.
    pub fn chop(&mut self, now_ms: u64) -> ChopOutcome {
        self.apply_chop(now_ms, true)
    }

    fn apply_chop(&mut self, now_ms: u64, punish_miss: bool) -> ChopOutcome {
        let outcome = self.engine.chop(&mut self.state, now_ms);
        if outcome.accepted {
            if outcome.waves_advanced > 0 {
                self.audio.play(SoundCue::WaveAdvance);
            }
            if outcome.bosses_defeated > 0 {
                self.audio.play(SoundCue::BossDefeat);
            }
            self.persist();
        } else if outcome.is_miss() && punish_miss {
            self.engine.miss(&mut self.state);
            self.audio.play(SoundCue::Miss);
            self.persist();
        }
        outcome
    }

    pub fn buy(&mut self, kind: UpgradeKind) -> bool {
        let bought = self.engine.buy_upgrade(&mut self.state, kind);
        if bought {
            self.audio.play(SoundCue::UpgradePurchase);
            self.persist();
        }
        bought
    }

    /// Purchase by storage key. Unknown keys do nothing.
    pub fn buy_by_key(&mut self, key: &str) -> bool {
        match UpgradeKind::from_key(key) {
            Some(kind) => self.buy(kind),
            None => {
                log::warn!("Unknown upgrade key {key:?}");
                false
            }
        }
    }

    pub fn dismiss_summary(&mut self) -> bool {
        self.engine.dismiss_summary(&mut self.state)
    }

    /// End the run and record it on the leaderboard. Returns the leaderboard
    /// rank if the run made it.
    pub fn retire(&mut self) -> Option<usize> {
        self.hold_next_ms = None;
        if !self.engine.retire(&mut self.state) {
            return None;
        }
        let rank = self.highscores.add_run(
            self.state.last_run_wood,
            self.state.last_run_wave,
            self.state.last_run_chops,
            platform::unix_time_ms(),
        );
        if let Some(rank) = rank {
            log::info!("Run ranked #{rank}");
            if let Err(e) = self.highscores.save(&mut self.store) {
                log::warn!("Failed to save high scores: {e}");
            }
        }
        self.persist();
        rank
    }

    pub fn restart(&mut self) {
        self.hold_next_ms = None;
        self.accumulator_ms = 0;
        self.engine.reset_run(&mut self.state);
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(e) = self.settings.save(&mut self.store) {
            log::warn!("Failed to save settings: {e}");
        }
    }

    /// Swap the balance values and keep them for the next session
    pub fn set_tuning(&mut self, tuning: Tuning) {
        if let Err(e) = save_json(&mut self.store, Tuning::STORAGE_KEY, &tuning) {
            log::warn!("Failed to save tuning: {e}");
        }
        self.engine.tuning = tuning;
    }

    /// Chop button pressed: chop now, then repeat while held
    pub fn press(&mut self, now_ms: u64) -> ChopOutcome {
        self.hold_next_ms = Some(now_ms + HOLD_REPEAT_MS);
        self.chop(now_ms)
    }

    /// Chop button released: no repeat fires after this
    pub fn release(&mut self) {
        self.hold_next_ms = None;
    }

    /// Inject every hold repeat due by `now_ms`. Returns the number of chops
    /// attempted. Repeats that land inside the cooldown are skipped, not
    /// counted as misses. After a stall longer than `MAX_FRAME_MS` the
    /// missed repeats are dropped and a single one fires at `now_ms`.
    pub fn poll_hold(&mut self, now_ms: u64) -> u32 {
        if let Some(next) = self.hold_next_ms {
            if next + MAX_FRAME_MS < now_ms {
                log::debug!("Dropping hold repeats for a {}ms stall", now_ms - next);
                self.hold_next_ms = Some(now_ms);
            }
        }
        let mut fired = 0;
        while let Some(next) = self.hold_next_ms {
            if next > now_ms {
                break;
            }
            self.hold_next_ms = Some(next + HOLD_REPEAT_MS);
            self.apply_chop(next, false);
            fired += 1;
        }
        fired
    }

    /// Per-frame entry point: run due hold repeats, then as many fixed
    /// ticks as the elapsed time covers (capped per frame)
    pub fn advance_frame(&mut self, now_ms: u64) -> u32 {
        self.poll_hold(now_ms);

        let dt = match self.last_frame_ms {
            Some(last) => now_ms.saturating_sub(last),
            None => TICK_MS,
        };
        self.last_frame_ms = Some(now_ms);
        self.accumulator_ms += dt.min(MAX_FRAME_MS);

        let mut substeps = 0;
        while self.accumulator_ms >= TICK_MS && substeps < MAX_SUBSTEPS {
            let outcome = self.engine.tick(&mut self.state, TICK_MS);
            self.on_tick(outcome);
            self.accumulator_ms -= TICK_MS;
            substeps += 1;
        }
        substeps
    }

    fn on_tick(&mut self, outcome: TickOutcome) {
        if outcome.swing_midpoint {
            self.audio.play(SoundCue::Swing);
        }
        if outcome.waves_advanced > 0 {
            self.audio.play(SoundCue::WaveAdvance);
            // Auto-chop and burn kills bank wood too
            self.persist();
        }
        if outcome.bosses_defeated > 0 {
            self.audio.play(SoundCue::BossDefeat);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = SavedProgress::from_state(&self.state).save(&mut self.store) {
            log::warn!("Failed to save progress: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingSink;
    use crate::persistence::MemoryStore;
    use crate::sim::ChopRejection;

    fn controller() -> GameController<MemoryStore, RecordingSink> {
        GameController::seeded(42, MemoryStore::default(), RecordingSink::default())
    }

    fn saved(c: &GameController<MemoryStore, RecordingSink>) -> SavedProgress {
        SavedProgress::load(c.store())
    }

    #[test]
    fn test_hydrates_from_store() {
        let mut store = MemoryStore::default();
        SavedProgress {
            wood: 75,
            total_wood: 900,
            high_score: 900,
            ..Default::default()
        }
        .save(&mut store)
        .unwrap();
        let c = GameController::seeded(1, store, RecordingSink::default());
        assert_eq!(c.state().wood, 75);
        assert_eq!(c.state().total_wood_chopped, 900);
        assert!(!c.state().started);
    }

    #[test]
    fn test_chop_persists() {
        let mut c = controller();
        assert!(!c.chop(1_000).accepted);
        assert_eq!(saved(&c), SavedProgress::default());

        c.start();
        assert!(c.chop(1_000).accepted);
        assert_eq!(saved(&c).wood, c.state().wood);
        assert!(saved(&c).wood >= 1);
    }

    #[test]
    fn test_too_fast_chop_is_a_miss() {
        let mut c = controller();
        c.start();
        c.chop(1_000);
        c.chop(1_400);
        assert!(c.state().combo >= 2);
        let outcome = c.chop(1_410);
        assert!(matches!(outcome.rejection, Some(ChopRejection::TooFast { .. })));
        assert_eq!(c.state().combo, 0);
        assert!(c.state().miss_flash_ms > 0);
        assert_eq!(c.audio().count(SoundCue::Miss), 1);
    }

    #[test]
    fn test_overlay_rejection_is_not_a_miss() {
        let mut c = controller();
        c.start();
        c.chop(1_000);
        c.state.show_summary = true;
        c.state.combo = 5;
        let outcome = c.chop(5_000);
        assert_eq!(outcome.rejection, Some(ChopRejection::OverlayShown));
        assert_eq!(c.state().combo, 5);
        assert_eq!(c.audio().count(SoundCue::Miss), 0);
    }

    #[test]
    fn test_buy_plays_cue_and_saves() {
        let mut c = controller();
        c.state.wood = 100;
        assert!(c.buy_by_key("axe_power"));
        assert_eq!(c.audio().count(SoundCue::UpgradePurchase), 1);
        let progress = saved(&c);
        assert_eq!(progress.wood, 60);
        assert_eq!(progress.upgrades.axe_power, 1);
        assert!(!c.buy_by_key("laser_axe"));
    }

    #[test]
    fn test_retire_records_run() {
        let mut c = controller();
        c.start();
        c.state.wood = 250;
        c.state.wave = 8;
        c.state.run_chops = 40;
        assert_eq!(c.retire(), Some(1));
        assert!(c.state().show_game_over);
        let top = c.highscores().top().unwrap();
        assert_eq!((top.wood, top.wave, top.chops), (250, 8, 40));
        assert_eq!(HighScores::load(c.store()), *c.highscores());
        // Only once per run
        assert_eq!(c.retire(), None);

        c.restart();
        assert!(c.state().is_running());
        assert_eq!(c.state().wave, 1);
        assert_eq!(c.state().wood, 250);
    }

    #[test]
    fn test_hold_repeats_until_release() {
        let mut c = controller();
        c.start();
        // 96ms cooldown, shorter than the repeat interval
        c.state.upgrades.axe_speed = 12;
        assert!(c.press(1_000).accepted);
        assert_eq!(c.poll_hold(1_129), 0);
        assert_eq!(c.poll_hold(1_130), 1);
        assert_eq!(c.poll_hold(1_300), 1);
        assert_eq!(c.poll_hold(1_390), 1);
        assert_eq!(c.state().chop_count, 4);

        c.release();
        assert!(!c.is_holding());
        assert_eq!(c.poll_hold(5_000), 0);
        assert_eq!(c.state().chop_count, 4);
    }

    #[test]
    fn test_hold_inside_cooldown_is_not_a_miss() {
        let mut c = controller();
        c.start();
        c.press(1_000);
        // Repeats at 1130 and 1260 hit the 360ms cooldown, 1390 lands
        assert_eq!(c.poll_hold(1_130), 1);
        assert_eq!(c.poll_hold(1_260), 1);
        assert_eq!(c.poll_hold(1_390), 1);
        assert_eq!(c.state().chop_count, 2);
        assert_eq!(c.audio().count(SoundCue::Miss), 0);
        assert!(c.state().combo >= 2);
    }

    #[test]
    fn test_stalled_hold_fires_once() {
        let mut c = controller();
        c.start();
        c.press(0);
        c.advance_frame(600_000);
        assert_eq!(c.state().chop_count, 2);
        assert_eq!(c.state().wave, 1);
        assert_eq!(c.audio().count(SoundCue::WaveAdvance), 0);
        assert!(c.is_holding());

        // Cadence resumes from the stall, inside the cooldown
        assert_eq!(c.poll_hold(600_129), 0);
        assert_eq!(c.poll_hold(600_130), 1);
        assert_eq!(c.state().chop_count, 2);
        assert_eq!(c.audio().count(SoundCue::Miss), 0);
    }

    #[test]
    fn test_frame_loop_fixed_steps() {
        let mut c = controller();
        c.start();
        // First frame runs one step
        assert_eq!(c.advance_frame(10_000), 1);
        assert_eq!(c.advance_frame(10_008), 0);
        assert_eq!(c.advance_frame(10_040), 2);
        // Long stall is clamped
        assert_eq!(c.advance_frame(60_000), 6);
        assert!(c.state().background_scroll > 0.0);
    }

    #[test]
    fn test_swing_cue_from_frames() {
        let mut c = controller();
        c.start();
        c.advance_frame(0);
        c.chop(0);
        let mut now = 0;
        while now < 600 {
            now += TICK_MS;
            c.advance_frame(now);
        }
        assert_eq!(c.audio().count(SoundCue::Swing), 1);
    }

    #[test]
    fn test_settings_saved() {
        let mut c = controller();
        let mut settings = Settings::default();
        settings.muted = true;
        c.update_settings(settings.clone());
        assert_eq!(Settings::load(c.store()), settings);
    }

    #[test]
    fn test_frame_fx_respects_settings() {
        let mut c = controller();
        c.state.shake_strength = 5.0;
        c.state.miss_flash_ms = 200;
        c.state.tree_health = c.state.tree_max_health / 2.0;
        let fx = c.frame_fx();
        assert_eq!(fx.shake, 5.0);
        assert!(fx.miss_flash);
        assert!((fx.health_fraction - 0.5).abs() < 0.0001);

        c.update_settings(Settings {
            reduced_motion: true,
            ..Settings::default()
        });
        let fx = c.frame_fx();
        assert_eq!(fx.shake, 0.0);
        assert!(!fx.miss_flash);
    }

    #[test]
    fn test_stored_tuning_override() {
        let mut store = MemoryStore::default();
        store
            .set(Tuning::STORAGE_KEY, r#"{ "base_cooldown_ms": 844 }"#)
            .unwrap();
        let mut c = GameController::seeded(3, store, RecordingSink::default());
        c.start();
        assert!(c.chop(1_000).accepted);
        let outcome = c.chop(1_500);
        assert!(matches!(outcome.rejection, Some(ChopRejection::TooFast { .. })));
    }

    #[test]
    fn test_bad_tuning_override_ignored() {
        let mut store = MemoryStore::default();
        store.set(Tuning::STORAGE_KEY, "{oops").unwrap();
        let mut c = GameController::seeded(3, store, RecordingSink::default());
        c.start();
        assert!(c.chop(1_000).accepted);
        assert!(c.chop(1_400).accepted);
    }

    #[test]
    fn test_set_tuning_persists() {
        let mut c = controller();
        let tuning = Tuning {
            base_cooldown_ms: 500,
            ..Tuning::default()
        };
        c.set_tuning(tuning.clone());
        c.start();
        assert!(c.chop(1_000).accepted);
        assert!(c.chop(1_400).rejection.is_some());

        let store = c.store().clone();
        let reloaded = GameController::seeded(4, store, RecordingSink::default());
        assert_eq!(reloaded.engine.tuning(), &tuning);
    }
}
