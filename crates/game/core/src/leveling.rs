//! Experience accrual and level-up stat growth.
//!
//! A monster at level `L` needs `threshold(L) = L × level_threshold_factor`
//! experience to reach `L + 1`. A level-up consumes the threshold and keeps
//! the remainder, so one large reward can cross several levels. Levels stop
//! at [`ArenaConfig::max_level`]; rewarding a monster already there fails.

use crate::config::ArenaConfig;
use crate::env::{ArenaEnv, CatalogError, MonsterRegistry, MonsterType, RegistryError};
use crate::error::{ArenaError, ErrorKind};
use crate::state::{MonsterId, MonsterInstance, PlayerId};
use crate::stats::MonsterStats;

/// Errors raised while rewarding experience.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LevelingError {
    #[error("{caller} is not authorized to reward monster {monster}")]
    Unauthorized { caller: PlayerId, monster: MonsterId },

    #[error("monster {monster} is already at max level {max_level}")]
    AtMaxLevel { monster: MonsterId, max_level: u32 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ArenaError for LevelingError {
    fn kind(&self) -> ErrorKind {
        match self {
            LevelingError::Unauthorized { .. } => ErrorKind::Authorization,
            LevelingError::AtMaxLevel { .. } => ErrorKind::StateConflict,
            LevelingError::Catalog(error) => error.kind(),
            LevelingError::Registry(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            LevelingError::Unauthorized { .. } => "LEVELING_UNAUTHORIZED",
            LevelingError::AtMaxLevel { .. } => "LEVELING_AT_MAX_LEVEL",
            LevelingError::Catalog(error) => error.error_code(),
            LevelingError::Registry(error) => error.error_code(),
        }
    }
}

/// Result of a successful reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelOutcome {
    pub monster: MonsterId,
    pub experience_gained: u32,
    pub previous_level: u32,
    pub level: u32,
    pub experience: u32,
}

impl LevelOutcome {
    pub fn leveled_up(&self) -> bool {
        self.level > self.previous_level
    }
}

/// Adds `amount` experience to `monster` and applies any resulting level-ups.
///
/// Only the owner or [`PlayerId::SYSTEM`] may reward a monster. On level-up,
/// attack and maximum health are recomputed for the new level and health is
/// topped up to the new maximum. Nothing is mutated when an error is returned.
///
/// # Errors
///
/// - `Unauthorized` if `caller` is neither the owner nor the system
/// - `AtMaxLevel` if the monster is already at `config.max_level`
pub fn reward_experience(
    monster: &mut MonsterInstance,
    caller: PlayerId,
    amount: u32,
    monster_type: &MonsterType,
    config: &ArenaConfig,
) -> Result<LevelOutcome, LevelingError> {
    if caller != monster.owner && !caller.is_system() {
        return Err(LevelingError::Unauthorized {
            caller,
            monster: monster.id,
        });
    }
    if monster.level >= config.max_level {
        return Err(LevelingError::AtMaxLevel {
            monster: monster.id,
            max_level: config.max_level,
        });
    }

    let previous_level = monster.level;
    monster.experience = monster.experience.saturating_add(amount);

    while monster.level < config.max_level {
        let threshold = config.level_threshold(monster.level).max(1);
        if monster.experience < threshold {
            break;
        }
        monster.experience -= threshold;
        monster.level += 1;
    }

    if monster.level > previous_level {
        monster.apply_stats(MonsterStats::at_level(monster_type, monster.level));
        monster.health = monster.max_health;
    }

    Ok(LevelOutcome {
        monster: monster.id,
        experience_gained: amount,
        previous_level,
        level: monster.level,
        experience: monster.experience,
    })
}

/// Loads a monster from the registry, rewards it and stores the result.
///
/// # Errors
///
/// Everything [`reward_experience`] returns, plus registry and catalog
/// lookups failures.
pub fn reward_registered(
    registry: &mut dyn MonsterRegistry,
    env: ArenaEnv<'_>,
    caller: PlayerId,
    id: MonsterId,
    amount: u32,
) -> Result<LevelOutcome, LevelingError> {
    let mut monster = registry.monster(id)?;
    let monster_type = env.monster_type(monster.type_id)?;
    let outcome = reward_experience(&mut monster, caller, amount, &monster_type, env.config())?;
    registry.store_progress(&monster)?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MonsterTypeId;

    const OWNER: PlayerId = PlayerId(1);

    fn dragon() -> MonsterType {
        MonsterType::new("Dragon", 100, 1000, 5, 10)
    }

    fn fresh_monster() -> MonsterInstance {
        MonsterInstance::new(
            MonsterId(0),
            OWNER,
            MonsterTypeId(0),
            MonsterStats::base(&dragon()),
            0,
        )
    }

    #[test]
    fn accumulates_experience_below_threshold() {
        let mut monster = fresh_monster();
        let outcome =
            reward_experience(&mut monster, OWNER, 5, &dragon(), &ArenaConfig::default()).unwrap();

        assert_eq!(monster.experience, 5);
        assert_eq!(monster.level, 1);
        assert!(!outcome.leveled_up());
    }

    #[test]
    fn crossing_threshold_levels_up_and_heals() {
        let mut monster = fresh_monster();
        monster.health = 10;

        reward_experience(&mut monster, OWNER, 10, &dragon(), &ArenaConfig::default()).unwrap();

        assert_eq!(monster.level, 2);
        assert_eq!(monster.experience, 0);
        assert_eq!(monster.attack, 105);
        assert_eq!(monster.max_health, 1100);
        assert_eq!(monster.health, 1100);
    }

    #[test]
    fn large_reward_crosses_several_levels_and_keeps_remainder() {
        let mut monster = fresh_monster();
        // level 1 needs 10, level 2 needs 20: 35 → level 3 with 5 left
        reward_experience(&mut monster, OWNER, 35, &dragon(), &ArenaConfig::default()).unwrap();

        assert_eq!(monster.level, 3);
        assert_eq!(monster.experience, 5);
    }

    #[test]
    fn rejects_non_owner_without_mutation() {
        let mut monster = fresh_monster();
        let before = monster.clone();

        let err = reward_experience(
            &mut monster,
            PlayerId(2),
            10,
            &dragon(),
            &ArenaConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, LevelingError::Unauthorized { .. }));
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert_eq!(monster, before);
    }

    #[test]
    fn system_caller_may_reward() {
        let mut monster = fresh_monster();
        reward_experience(
            &mut monster,
            PlayerId::SYSTEM,
            3,
            &dragon(),
            &ArenaConfig::default(),
        )
        .unwrap();
        assert_eq!(monster.experience, 3);
    }

    #[test]
    fn ninth_reward_fails_at_max_level() {
        let config = ArenaConfig::default();
        let mut monster = fresh_monster();

        for level in 1..config.max_level {
            let outcome =
                reward_experience(&mut monster, OWNER, level * 10, &dragon(), &config).unwrap();
            assert_eq!(outcome.level, level + 1);
        }
        assert_eq!(monster.level, config.max_level);

        let err = reward_experience(&mut monster, OWNER, 1, &dragon(), &config).unwrap_err();
        assert_eq!(
            err,
            LevelingError::AtMaxLevel {
                monster: MonsterId(0),
                max_level: 9
            }
        );
    }

    #[test]
    fn level_stops_at_max_and_keeps_overflow() {
        let config = ArenaConfig::default().with_max_level(2);
        let mut monster = fresh_monster();

        reward_experience(&mut monster, OWNER, 25, &dragon(), &config).unwrap();

        assert_eq!(monster.level, 2);
        assert_eq!(monster.experience, 15);
    }
}
