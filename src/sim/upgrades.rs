//! Shop upgrades
//!
//! Six independent, permanently leveled purchases. Each kind carries its own
//! static definition; cost grows geometrically with the current level.

use serde::{Deserialize, Serialize};

/// Default geometric growth factor for upgrade prices
pub const DEFAULT_COST_SCALE: f64 = 1.35;

/// The six upgrade kinds, in shop display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Shorter swing cooldown
    AxeSpeed,
    /// More damage per chop
    AxePower,
    /// Damage over time after each chop ("Stronger Arms")
    AutoChop,
    /// Chance of bonus wood when a tree falls
    LuckyWood,
    /// Burn damage after each chop
    FireAxe,
    /// Chance for a chop to land twice
    DoubleChop,
}

/// Static shop entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeDefinition {
    pub kind: UpgradeKind,
    pub title: &'static str,
    pub description: &'static str,
    pub base_cost: u64,
    pub cost_scale: f64,
}

impl UpgradeDefinition {
    /// Price of the next level when `level` levels are already owned
    pub fn cost_at(&self, level: u32) -> u64 {
        (self.base_cost as f64 * self.cost_scale.powi(level as i32)).floor() as u64
    }
}

const DEFINITIONS: [UpgradeDefinition; 6] = [
    UpgradeDefinition {
        kind: UpgradeKind::AxeSpeed,
        title: "Quicker Axe",
        description: "Swing cooldown drops, your shoulders complain louder.",
        base_cost: 30,
        cost_scale: DEFAULT_COST_SCALE,
    },
    UpgradeDefinition {
        kind: UpgradeKind::AxePower,
        title: "Heavier Head",
        description: "Each chop hits harder because subtlety is dead.",
        base_cost: 40,
        cost_scale: DEFAULT_COST_SCALE,
    },
    UpgradeDefinition {
        kind: UpgradeKind::AutoChop,
        title: "Stronger Arms",
        description: "Keeps hacking for a few seconds after every chop.",
        base_cost: 60,
        cost_scale: DEFAULT_COST_SCALE,
    },
    UpgradeDefinition {
        kind: UpgradeKind::LuckyWood,
        title: "Wood Magnet",
        description: "Chance to spawn bonus wood. Economics, but dumb.",
        base_cost: 75,
        cost_scale: DEFAULT_COST_SCALE,
    },
    UpgradeDefinition {
        kind: UpgradeKind::FireAxe,
        title: "Fire Axe",
        description: "Burn damage over time. OSHA unfriendly.",
        base_cost: 90,
        cost_scale: DEFAULT_COST_SCALE,
    },
    UpgradeDefinition {
        kind: UpgradeKind::DoubleChop,
        title: "Double Chop",
        description: "Occasionally lands two chops in one swing.",
        base_cost: 120,
        cost_scale: DEFAULT_COST_SCALE,
    },
];

impl UpgradeKind {
    /// All upgrade kinds in display order
    pub fn all() -> &'static [UpgradeKind] {
        &[
            UpgradeKind::AxeSpeed,
            UpgradeKind::AxePower,
            UpgradeKind::AutoChop,
            UpgradeKind::LuckyWood,
            UpgradeKind::FireAxe,
            UpgradeKind::DoubleChop,
        ]
    }

    fn index(self) -> usize {
        match self {
            UpgradeKind::AxeSpeed => 0,
            UpgradeKind::AxePower => 1,
            UpgradeKind::AutoChop => 2,
            UpgradeKind::LuckyWood => 3,
            UpgradeKind::FireAxe => 4,
            UpgradeKind::DoubleChop => 5,
        }
    }

    /// Stable key used by storage and the web bridge
    pub fn key(self) -> &'static str {
        match self {
            UpgradeKind::AxeSpeed => "axe_speed",
            UpgradeKind::AxePower => "axe_power",
            UpgradeKind::AutoChop => "auto_chop",
            UpgradeKind::LuckyWood => "lucky_wood",
            UpgradeKind::FireAxe => "fire_axe",
            UpgradeKind::DoubleChop => "double_chop",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.key() == key)
    }

    pub fn definition(self) -> &'static UpgradeDefinition {
        &DEFINITIONS[self.index()]
    }
}

/// Owned level of every upgrade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeLevels {
    pub axe_speed: u32,
    pub axe_power: u32,
    pub auto_chop: u32,
    pub lucky_wood: u32,
    pub fire_axe: u32,
    pub double_chop: u32,
}

impl UpgradeLevels {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::AxeSpeed => self.axe_speed,
            UpgradeKind::AxePower => self.axe_power,
            UpgradeKind::AutoChop => self.auto_chop,
            UpgradeKind::LuckyWood => self.lucky_wood,
            UpgradeKind::FireAxe => self.fire_axe,
            UpgradeKind::DoubleChop => self.double_chop,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::AxeSpeed => &mut self.axe_speed,
            UpgradeKind::AxePower => &mut self.axe_power,
            UpgradeKind::AutoChop => &mut self.auto_chop,
            UpgradeKind::LuckyWood => &mut self.lucky_wood,
            UpgradeKind::FireAxe => &mut self.fire_axe,
            UpgradeKind::DoubleChop => &mut self.double_chop,
        }
    }

    /// Raise exactly one upgrade by one level
    pub fn increment(&mut self, kind: UpgradeKind) {
        let level = self.level_mut(kind);
        *level = level.saturating_add(1);
    }

    /// Price of the next level of `kind`
    pub fn next_cost(&self, kind: UpgradeKind) -> u64 {
        kind.definition().cost_at(self.level(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip_for_every_kind() {
        for &kind in UpgradeKind::all() {
            assert_eq!(UpgradeKind::from_key(kind.key()), Some(kind));
            assert_eq!(kind.definition().kind, kind);
        }
        assert_eq!(UpgradeKind::from_key("golden_axe"), None);
    }

    #[test]
    fn test_cost_curve_is_geometric() {
        let def = UpgradeKind::AxePower.definition();
        assert_eq!(def.cost_at(0), 40);
        assert_eq!(def.cost_at(1), 54);
        assert_eq!(def.cost_at(2), 72); // 40 * 1.8225 = 72.9
        let mut last = 0;
        for level in 0..20 {
            let cost = def.cost_at(level);
            assert!(cost > last, "cost must strictly grow (level {})", level);
            last = cost;
        }
    }

    #[test]
    fn test_increment_touches_one_level_only() {
        let mut levels = UpgradeLevels::default();
        levels.increment(UpgradeKind::FireAxe);
        levels.increment(UpgradeKind::FireAxe);
        assert_eq!(levels.fire_axe, 2);
        for &kind in UpgradeKind::all() {
            if kind != UpgradeKind::FireAxe {
                assert_eq!(levels.level(kind), 0);
            }
        }
        assert_eq!(levels.next_cost(UpgradeKind::FireAxe), (90.0 * 1.35f64.powi(2)) as u64);
    }
}
