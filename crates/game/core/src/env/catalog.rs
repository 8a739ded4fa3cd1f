//! Monster type and skill definitions and the catalog oracle interface.
//!
//! Catalog content is immutable while the rules run. Administrative edits
//! (adding types, attaching skills) happen in the runtime's catalog
//! implementation between calls.

use crate::state::{MonsterTypeId, SkillId, SkillSet};

/// How a skill's magnitude is applied.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillType {
    /// Damages an opposing monster.
    Physical,
    /// Damages an opposing monster.
    Special,
    /// Restores the acting monster's health.
    Heal,
}

impl SkillType {
    pub const fn is_heal(self) -> bool {
        matches!(self, SkillType::Heal)
    }

    /// Stable numeric code used in notifications (`Physical = 0`).
    pub const fn code(self) -> u8 {
        match self {
            SkillType::Physical => 0,
            SkillType::Special => 1,
            SkillType::Heal => 2,
        }
    }
}

/// A named action with a multiplier, a type and a cooldown in turns.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Skill {
    pub name: String,
    /// Percentage of the user's attack (100 = 1.0x).
    pub damage_multiplier_percent: u32,
    pub skill_type: SkillType,
    pub cooldown_turns: u32,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        damage_multiplier_percent: u32,
        skill_type: SkillType,
        cooldown_turns: u32,
    ) -> Self {
        Self {
            name: name.into(),
            damage_multiplier_percent,
            skill_type,
            cooldown_turns,
        }
    }
}

/// Shared template many monster instances reference.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterType {
    pub name: String,
    pub base_attack: u32,
    pub base_health: u32,
    pub attack_growth_percent: u32,
    pub health_growth_percent: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skill_set: SkillSet,
}

impl MonsterType {
    pub fn new(
        name: impl Into<String>,
        base_attack: u32,
        base_health: u32,
        attack_growth_percent: u32,
        health_growth_percent: u32,
    ) -> Self {
        Self {
            name: name.into(),
            base_attack,
            base_health,
            attack_growth_percent,
            health_growth_percent,
            skill_set: SkillSet::new(),
        }
    }

    /// Attaches a skill (builder pattern). Extra skills past capacity are dropped.
    #[must_use]
    pub fn with_skill(mut self, skill: SkillId) -> Self {
        let _ = self.skill_set.try_push(skill);
        self
    }

    /// Position of `skill` in the skill set, which is also its cooldown slot.
    pub fn skill_slot(&self, skill: SkillId) -> Option<usize> {
        self.skill_set.iter().position(|&id| id == skill)
    }
}

/// Read-only lookup of monster types and skills.
pub trait CatalogOracle: Send + Sync {
    fn monster_type(&self, id: MonsterTypeId) -> Option<MonsterType>;

    fn skill(&self, id: SkillId) -> Option<Skill>;
}
