//! Skill resolution.
//!
//! Pure functions turning an attacker's stats and a skill definition into an
//! effect. All combat math is deterministic and side-effect free; the engine
//! decides which monster records the effect is written to.

pub mod damage;

pub use damage::{apply_damage, apply_heal, calculate_magnitude};

use crate::env::{Skill, SkillType};

/// Effect of one skill use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Health removed from an opposing monster.
    Damage(u32),
    /// Health restored to the acting monster.
    Heal(u32),
}

impl SkillEffect {
    pub fn amount(&self) -> u32 {
        match *self {
            SkillEffect::Damage(amount) | SkillEffect::Heal(amount) => amount,
        }
    }
}

/// Resolve a skill used by a monster with the given attack.
pub fn resolve_skill(attack: u32, skill: &Skill) -> SkillEffect {
    let magnitude = calculate_magnitude(attack, skill.damage_multiplier_percent);
    match skill.skill_type {
        SkillType::Physical | SkillType::Special => SkillEffect::Damage(magnitude),
        SkillType::Heal => SkillEffect::Heal(magnitude),
    }
}
