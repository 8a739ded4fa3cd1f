//! Level-derived combat stats.
//!
//! Stored state is only `level` (plus current health); attack and maximum
//! health are always recomputed from the monster type:
//!
//! ```text
//! attack(1)     = base_attack
//! attack(L + 1) = floor(attack(L) × (100 + attack_growth_percent) / 100)
//! ```
//!
//! and likewise for health with `health_growth_percent`. Flooring happens at
//! every step so the result is identical no matter where it is computed.

use crate::env::MonsterType;

/// Attack and maximum health of a monster at a given level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterStats {
    pub attack: u32,
    pub max_health: u32,
}

impl MonsterStats {
    /// Base stats of the type (level 1).
    pub fn base(monster_type: &MonsterType) -> Self {
        Self {
            attack: monster_type.base_attack,
            max_health: monster_type.base_health,
        }
    }

    /// Stats after compounding growth for every level above 1.
    pub fn at_level(monster_type: &MonsterType, level: u32) -> Self {
        let mut stats = Self::base(monster_type);
        for _ in 1..level.max(1) {
            stats = stats.grow(monster_type);
        }
        stats
    }

    /// Applies one level of growth.
    pub fn grow(self, monster_type: &MonsterType) -> Self {
        Self {
            attack: compound(self.attack, monster_type.attack_growth_percent),
            max_health: compound(self.max_health, monster_type.health_growth_percent),
        }
    }
}

fn compound(value: u32, growth_percent: u32) -> u32 {
    let grown = u64::from(value) * (100 + u64::from(growth_percent)) / 100;
    u32::try_from(grown).unwrap_or(u32::MAX)
}
