//! Achievements
//!
//! Fixed list, unlocked from cumulative stats. Unlocks are sticky: once an
//! achievement is unlocked it stays unlocked for the rest of the session.

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::consts::BOSS_WAVE_INTERVAL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    Chops100,
    Wave25,
    Wood5k,
    Boss5,
    Combo40,
}

impl AchievementId {
    pub fn all() -> &'static [AchievementId] {
        &[
            AchievementId::Chops100,
            AchievementId::Wave25,
            AchievementId::Wood5k,
            AchievementId::Boss5,
            AchievementId::Combo40,
        ]
    }

    pub fn title(self) -> &'static str {
        match self {
            AchievementId::Chops100 => "Splinter Apprentice",
            AchievementId::Wave25 => "Forest Tax Collector",
            AchievementId::Wood5k => "Timber Tycoon",
            AchievementId::Boss5 => "Bark Bouncer",
            AchievementId::Combo40 => "Tap Goblin",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AchievementId::Chops100 => "Chop 100 times. Congrats, you're now legally stubborn.",
            AchievementId::Wave25 => "Reach wave 25 and bill the trees emotionally.",
            AchievementId::Wood5k => "Earn 5000 wood. Late-stage capitalism, but rustic.",
            AchievementId::Boss5 => "Take down 5 boss trees with zero sympathy.",
            AchievementId::Combo40 => "Hit a 40 combo before your thumbs file complaints.",
        }
    }

    /// Whether the current stats satisfy this achievement
    fn is_met(self, state: &GameState) -> bool {
        match self {
            AchievementId::Chops100 => state.chop_count >= 100,
            AchievementId::Wave25 => state.wave >= 25,
            AchievementId::Wood5k => state.total_wood_chopped >= 5000,
            // Boss trees cleared this run
            AchievementId::Boss5 => state.wave / BOSS_WAVE_INTERVAL >= 5,
            AchievementId::Combo40 => state.combo >= 40,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub unlocked: bool,
}

/// Fresh, all-locked achievement list
pub fn base_achievements() -> Vec<Achievement> {
    AchievementId::all()
        .iter()
        .map(|&id| Achievement {
            id,
            unlocked: false,
        })
        .collect()
}

/// Re-evaluate unlocks against the current stats. Returns newly unlocked ids.
pub fn update_achievements(state: &mut GameState) -> Vec<AchievementId> {
    let mut newly = Vec::new();
    for i in 0..state.achievements.len() {
        let id = state.achievements[i].id;
        if !state.achievements[i].unlocked && id.is_met(state) {
            state.achievements[i].unlocked = true;
            newly.push(id);
        }
    }
    newly
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_from_stats() {
        let mut state = GameState::new();
        state.chop_count = 100;
        state.combo = 40;
        let newly = update_achievements(&mut state);
        assert_eq!(newly, vec![AchievementId::Chops100, AchievementId::Combo40]);
        assert!(state.is_unlocked(AchievementId::Chops100));
        assert!(!state.is_unlocked(AchievementId::Wave25));
    }

    #[test]
    fn test_unlocks_are_sticky() {
        let mut state = GameState::new();
        state.combo = 45;
        update_achievements(&mut state);
        state.combo = 0;
        let newly = update_achievements(&mut state);
        assert!(newly.is_empty());
        assert!(state.is_unlocked(AchievementId::Combo40));
    }

    #[test]
    fn test_boss_count_from_wave() {
        let mut state = GameState::new();
        state.wave = 49;
        update_achievements(&mut state);
        assert!(!state.is_unlocked(AchievementId::Boss5));
        state.wave = 50;
        update_achievements(&mut state);
        assert!(state.is_unlocked(AchievementId::Boss5));
    }
}
