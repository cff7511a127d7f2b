//! Timber Tap entry point
//!
//! The web build is driven from JavaScript through `platform::WebGame`.
//! Natively this runs a short scripted headless session against a file
//! store and logs what happened.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use timber_tap::audio::{RecordingSink, SoundCue};
    use timber_tap::consts::TICK_MS;
    use timber_tap::persistence::{BackgroundStore, FileStore};
    use timber_tap::platform;
    use timber_tap::sim::UpgradeKind;
    use timber_tap::GameController;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Timber Tap (native) starting...");
    log::info!("Native mode is a headless demo - serve the wasm build for the real game");

    let data_dir = std::env::temp_dir().join("timber-tap-demo");
    let store = BackgroundStore::new(FileStore::open(&data_dir)?);
    log::info!("Saving to {}", data_dir.display());

    let mut game = GameController::seeded(platform::clock_seed(), store, RecordingSink::default());
    game.start();

    // Hold the chop button for 20 simulated seconds at 60 fps
    let mut now = 0;
    let mut frame = 0u64;
    game.press(now);
    while now < 20_000 {
        now += TICK_MS;
        frame += 1;
        game.advance_frame(now);
        if game.state().show_summary {
            log::info!("Boss wave: {}", game.state().summary_message);
            game.dismiss_summary();
        }
        // Shop every ~5 seconds
        if frame % 300 == 0 {
            for &kind in UpgradeKind::all() {
                game.buy(kind);
            }
        }
    }
    game.release();

    // Let the over-time effects run out
    for _ in 0..300 {
        now += TICK_MS;
        game.advance_frame(now);
    }

    let rank = game.retire();
    let state = game.state();
    log::info!(
        "Retired at wave {} after {} chops with {} wood (best combo {})",
        state.last_run_wave,
        state.last_run_chops,
        state.last_run_wood,
        state.best_combo
    );
    match rank {
        Some(rank) => log::info!("Leaderboard rank #{rank}"),
        None => log::info!("Run didn't make the leaderboard"),
    }
    let unlocked: Vec<&str> = state
        .achievements
        .iter()
        .filter(|a| a.unlocked)
        .map(|a| a.id.title())
        .collect();
    log::info!("Achievements: {unlocked:?}");
    log::info!(
        "Cues: {} swings, {} trees, {} bosses, {} purchases, {} misses",
        game.audio().count(SoundCue::Swing),
        game.audio().count(SoundCue::WaveAdvance),
        game.audio().count(SoundCue::BossDefeat),
        game.audio().count(SoundCue::UpgradePurchase),
        game.audio().count(SoundCue::Miss)
    );

    game.store().flush()?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::wasm_start, this is just to satisfy the compiler
}
