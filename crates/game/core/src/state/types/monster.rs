//! Monster instances as stored by the registry.

use arrayvec::ArrayVec;

use crate::config::ArenaConfig;
use crate::stats::MonsterStats;

use super::common::{MonsterId, MonsterTypeId, PlayerId, SkillId};

/// Remaining cooldown per skill, index-aligned with the type's skill set.
pub type Cooldowns = ArrayVec<u32, { ArenaConfig::MAX_SKILLS }>;

/// Ordered skill set of a monster type.
pub type SkillSet = ArrayVec<SkillId, { ArenaConfig::MAX_SKILLS }>;

/// A player-owned creature with derived combat stats and skill cooldowns.
///
/// `attack` and `max_health` are derived from the type and level; they are
/// stored so the registry can serve a complete record without a catalog
/// lookup, and are recomputed on every level-up.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterInstance {
    pub id: MonsterId,
    pub owner: PlayerId,
    pub type_id: MonsterTypeId,
    pub level: u32,
    pub experience: u32,
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
    pub cooldowns: Cooldowns,
}

impl MonsterInstance {
    /// Creates a level-1 monster at full health with every skill ready.
    pub fn new(
        id: MonsterId,
        owner: PlayerId,
        type_id: MonsterTypeId,
        stats: MonsterStats,
        skill_count: usize,
    ) -> Self {
        let mut cooldowns = Cooldowns::new();
        for _ in 0..skill_count.min(ArenaConfig::MAX_SKILLS) {
            cooldowns.push(0);
        }

        Self {
            id,
            owner,
            type_id,
            level: 1,
            experience: 0,
            health: stats.max_health,
            max_health: stats.max_health,
            attack: stats.attack,
            cooldowns,
        }
    }

    /// Returns true once health has reached zero.
    #[inline]
    pub fn is_fainted(&self) -> bool {
        self.health == 0
    }

    /// Remaining cooldown of the skill at `slot` (0 for slots past the end).
    pub fn cooldown(&self, slot: usize) -> u32 {
        self.cooldowns.get(slot).copied().unwrap_or(0)
    }

    /// Applies derived stats, keeping current health within the new maximum.
    pub fn apply_stats(&mut self, stats: MonsterStats) {
        self.attack = stats.attack;
        self.max_health = stats.max_health;
        self.health = self.health.min(self.max_health);
    }
}
