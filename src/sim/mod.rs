//! Deterministic gameplay engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(delta_ms)` and chop timestamps
//! - Injected RNG only
//! - No rendering, storage or audio dependencies

pub mod achievements;
pub mod chop;
pub mod engine;
pub mod quotes;
pub mod state;
pub mod tick;
pub mod tuning;
pub mod upgrades;

pub use achievements::{Achievement, AchievementId};
pub use chop::{ChopOutcome, ChopRejection};
pub use engine::ChopEngine;
pub use state::{ChipParticle, DamageNumber, GameState, Quote, RunPhase, SeasonEvent};
pub use tick::TickOutcome;
pub use tuning::Tuning;
pub use upgrades::{UpgradeDefinition, UpgradeKind, UpgradeLevels};
