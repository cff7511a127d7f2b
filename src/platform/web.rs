//! JavaScript-facing game handle
//!
//! The page owns rendering and input; it forwards events here and reads the
//! state back as JSON every frame.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudioSink;
use crate::controller::GameController;
use crate::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
use crate::settings::Settings;
use crate::sim::Tuning;

/// Module init: logging and panic messages go to the browser console
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Timber Tap starting...");
}

type WebController = GameController<Box<dyn KeyValueStore>, WebAudioSink>;

#[wasm_bindgen]
pub struct WebGame {
    controller: WebController,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}, progress will not survive a reload");
                Box::new(MemoryStore::default())
            }
        };
        let audio = WebAudioSink::new(&Settings::load(&store));
        let seed = super::clock_seed();
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            controller: GameController::seeded(seed, store, audio),
        }
    }

    pub fn start(&mut self) -> bool {
        self.controller.audio().resume();
        self.controller.start()
    }

    /// Single tap. Returns whether the chop landed.
    pub fn chop(&mut self, now_ms: f64) -> bool {
        self.controller.chop(now_ms as u64).accepted
    }

    pub fn press(&mut self, now_ms: f64) -> bool {
        self.controller.audio().resume();
        self.controller.press(now_ms as u64).accepted
    }

    pub fn release(&mut self) {
        self.controller.release();
    }

    /// requestAnimationFrame callback
    pub fn frame(&mut self, now_ms: f64) {
        self.controller.advance_frame(now_ms as u64);
    }

    pub fn buy(&mut self, key: &str) -> bool {
        self.controller.buy_by_key(key)
    }

    /// Returns the leaderboard rank, 0 when the run didn't place
    pub fn retire(&mut self) -> u32 {
        self.controller.retire().map(|r| r as u32).unwrap_or(0)
    }

    pub fn restart(&mut self) {
        self.controller.restart();
    }

    pub fn dismiss_summary(&mut self) -> bool {
        self.controller.dismiss_summary()
    }

    pub fn state_json(&self) -> String {
        serde_json::to_string(self.controller.state()).unwrap_or_default()
    }

    pub fn highscores_json(&self) -> String {
        serde_json::to_string(self.controller.highscores()).unwrap_or_default()
    }

    /// Shake, miss flash and health bar for this frame
    pub fn frame_fx_json(&self) -> String {
        serde_json::to_string(&self.controller.frame_fx()).unwrap_or_default()
    }

    /// Swing sprite index for a sheet of `frame_count` frames
    pub fn swing_frame(&self, frame_count: u32) -> u32 {
        self.controller.state().swing_frame(frame_count as usize) as u32
    }

    /// Apply and save a (possibly partial) balance override. Returns false
    /// on bad input.
    pub fn set_tuning_json(&mut self, json: &str) -> bool {
        match Tuning::from_json(json) {
            Ok(tuning) => {
                self.controller.set_tuning(tuning);
                true
            }
            Err(e) => {
                log::warn!("Rejected tuning: {e}");
                false
            }
        }
    }

    pub fn settings_json(&self) -> String {
        serde_json::to_string(self.controller.settings()).unwrap_or_default()
    }

    /// Replace settings from the page's JSON. Returns false on bad input.
    pub fn set_settings_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => {
                self.controller.audio_mut().apply_settings(&settings);
                self.controller.update_settings(settings);
                true
            }
            Err(e) => {
                log::warn!("Rejected settings: {e}");
                false
            }
        }
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
