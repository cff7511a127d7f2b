//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Storage selection (LocalStorage on web, files on native)
//! - The JavaScript-facing game handle (web only)

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebGame;

/// Milliseconds since the Unix epoch, for leaderboard timestamps and seeds
#[cfg(target_arch = "wasm32")]
pub fn unix_time_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn unix_time_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// RNG seed derived from the clock
pub fn clock_seed() -> u64 {
    unix_time_ms() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_after_2020() {
        assert!(unix_time_ms() > 1_577_836_800_000.0);
        assert!(clock_seed() > 0);
    }
}
