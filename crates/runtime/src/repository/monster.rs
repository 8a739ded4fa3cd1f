//! In-memory [`MonsterRegistry`] implementation.

use arena_core::{
    ArenaConfig, CatalogError, CatalogOracle, Cooldowns, MonsterId, MonsterInstance,
    MonsterRegistry, MonsterStats, MonsterTypeId, PlayerId, RegistryError, SkillId,
};

/// Minted monsters indexed by id.
///
/// Ids are assigned sequentially from 0. The registry is a plain value so the
/// worker can stage a clone of it together with the rest of the arena state.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMonsterRegistry {
    monsters: Vec<MonsterInstance>,
}

impl InMemoryMonsterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: MonsterId) -> Option<&MonsterInstance> {
        self.monsters.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: MonsterId) -> Result<&mut MonsterInstance, RegistryError> {
        self.monsters
            .get_mut(id.0 as usize)
            .ok_or(RegistryError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Monsters owned by `owner`, in mint order.
    pub fn monsters_of(&self, owner: PlayerId) -> impl Iterator<Item = &MonsterInstance> {
        self.monsters
            .iter()
            .filter(move |monster| monster.owner == owner)
    }

    /// Creates a level-1 monster of `type_id` for `owner` at full health.
    ///
    /// # Errors
    ///
    /// - `MonsterLimitReached` once [`ArenaConfig::MAX_MONSTERS`] exist
    /// - `Catalog` if the type is unknown
    pub fn mint(
        &mut self,
        owner: PlayerId,
        type_id: MonsterTypeId,
        catalog: &dyn CatalogOracle,
    ) -> Result<MonsterId, RegistryError> {
        if self.monsters.len() >= ArenaConfig::MAX_MONSTERS {
            return Err(RegistryError::MonsterLimitReached {
                limit: ArenaConfig::MAX_MONSTERS,
            });
        }
        let monster_type = catalog
            .monster_type(type_id)
            .ok_or(CatalogError::MonsterTypeNotFound(type_id))?;

        let id = MonsterId(self.monsters.len() as u32);
        self.monsters.push(MonsterInstance::new(
            id,
            owner,
            type_id,
            MonsterStats::base(&monster_type),
            monster_type.skill_set.len(),
        ));
        Ok(id)
    }

    /// Owner edit of current health.
    ///
    /// # Errors
    ///
    /// `NotAuthorized` for anyone but the owner, `HealthAboveMax` past the
    /// monster's maximum health.
    pub fn set_monster_health(
        &mut self,
        caller: PlayerId,
        id: MonsterId,
        health: u32,
    ) -> Result<(), RegistryError> {
        let monster = self.owned_mut(caller, id)?;
        if health > monster.max_health {
            return Err(RegistryError::HealthAboveMax {
                health,
                max_health: monster.max_health,
            });
        }
        monster.health = health;
        Ok(())
    }

    /// Owner edit of cooldowns. `cooldowns` may cover a prefix of the skill
    /// slots; remaining slots keep their value.
    ///
    /// # Errors
    ///
    /// `NotAuthorized`, or `CooldownLength` when more values than the type
    /// has skills are given.
    pub fn set_monster_cooldowns(
        &mut self,
        caller: PlayerId,
        id: MonsterId,
        cooldowns: &[u32],
        catalog: &dyn CatalogOracle,
    ) -> Result<(), RegistryError> {
        let type_id = self.owned_mut(caller, id)?.type_id;
        let monster_type = catalog
            .monster_type(type_id)
            .ok_or(CatalogError::MonsterTypeNotFound(type_id))?;
        let expected = monster_type.skill_set.len();
        if cooldowns.len() > expected {
            return Err(RegistryError::CooldownLength {
                expected,
                provided: cooldowns.len(),
            });
        }

        let monster = self.get_mut(id)?;
        while monster.cooldowns.len() < expected {
            monster.cooldowns.push(0);
        }
        monster.cooldowns[..cooldowns.len()].copy_from_slice(cooldowns);
        Ok(())
    }

    /// Drops cooldown slot `index` from every monster of `type_id`, matching a
    /// skill removed from the type's skill set.
    pub fn remove_cooldown_slot(&mut self, type_id: MonsterTypeId, index: usize) {
        for monster in self.monsters_of_type(type_id) {
            if index < monster.cooldowns.len() {
                monster.cooldowns.remove(index);
            }
        }
    }

    /// Rebuilds the cooldowns of every monster of `type_id` after its skill
    /// set changed from `previous` to `current`. Each skill keeps its counter;
    /// skills new to the set start ready.
    pub fn realign_cooldowns(
        &mut self,
        type_id: MonsterTypeId,
        previous: &[SkillId],
        current: &[SkillId],
    ) {
        for monster in self.monsters_of_type(type_id) {
            let mut taken = vec![false; previous.len()];
            let realigned: Cooldowns = current
                .iter()
                .map(|skill| {
                    let slot = previous
                        .iter()
                        .enumerate()
                        .position(|(slot, old)| old == skill && !taken[slot]);
                    match slot {
                        Some(slot) => {
                            taken[slot] = true;
                            monster.cooldown(slot)
                        }
                        None => 0,
                    }
                })
                .collect();
            monster.cooldowns = realigned;
        }
    }

    fn monsters_of_type(
        &mut self,
        type_id: MonsterTypeId,
    ) -> impl Iterator<Item = &mut MonsterInstance> {
        self.monsters
            .iter_mut()
            .filter(move |monster| monster.type_id == type_id)
    }

    fn owned_mut(
        &mut self,
        caller: PlayerId,
        id: MonsterId,
    ) -> Result<&mut MonsterInstance, RegistryError> {
        let monster = self.get_mut(id)?;
        if monster.owner != caller {
            return Err(RegistryError::NotAuthorized {
                caller,
                monster: id,
            });
        }
        Ok(monster)
    }
}

impl MonsterRegistry for InMemoryMonsterRegistry {
    fn monster(&self, id: MonsterId) -> Result<MonsterInstance, RegistryError> {
        self.get(id).cloned().ok_or(RegistryError::NotFound(id))
    }

    fn set_health(&mut self, id: MonsterId, health: u32) -> Result<(), RegistryError> {
        let monster = self.get_mut(id)?;
        monster.health = health.min(monster.max_health);
        Ok(())
    }

    fn set_cooldowns(&mut self, id: MonsterId, cooldowns: &Cooldowns) -> Result<(), RegistryError> {
        self.get_mut(id)?.cooldowns = cooldowns.clone();
        Ok(())
    }

    fn store_progress(&mut self, progress: &MonsterInstance) -> Result<(), RegistryError> {
        let monster = self.get_mut(progress.id)?;
        monster.level = progress.level;
        monster.experience = progress.experience;
        monster.attack = progress.attack;
        monster.max_health = progress.max_health;
        monster.health = progress.health;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arena_core::{MonsterType, Skill, SkillType};

    use super::*;
    use crate::oracle::CatalogOracleImpl;

    const OWNER: PlayerId = PlayerId(1);
    const OTHER: PlayerId = PlayerId(2);

    fn catalog() -> CatalogOracleImpl {
        let catalog = CatalogOracleImpl::new();
        let breath = catalog
            .add_skill(Skill::new("Fire Breath", 100, SkillType::Physical, 0))
            .unwrap();
        let roar = catalog
            .add_skill(Skill::new("Roar", 150, SkillType::Special, 2))
            .unwrap();
        catalog
            .add_monster_type(
                MonsterType::new("Dragon", 100, 1000, 5, 10)
                    .with_skill(breath)
                    .with_skill(roar),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn mint_assigns_sequential_ids_at_full_health() {
        let catalog = catalog();
        let mut registry = InMemoryMonsterRegistry::new();

        let first = registry.mint(OWNER, MonsterTypeId(0), &catalog).unwrap();
        let second = registry.mint(OTHER, MonsterTypeId(0), &catalog).unwrap();

        assert_eq!((first, second), (MonsterId(0), MonsterId(1)));
        let monster = registry.get(first).unwrap();
        assert_eq!(monster.level, 1);
        assert_eq!(monster.health, 1000);
        assert_eq!(monster.cooldowns.as_slice(), &[0, 0]);
        assert_eq!(registry.monsters_of(OTHER).count(), 1);
    }

    #[test]
    fn mint_rejects_unknown_type() {
        let mut registry = InMemoryMonsterRegistry::new();
        let err = registry
            .mint(OWNER, MonsterTypeId(9), &catalog())
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Catalog(CatalogError::MonsterTypeNotFound(MonsterTypeId(9)))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn owner_sets_health_within_bounds() {
        let catalog = catalog();
        let mut registry = InMemoryMonsterRegistry::new();
        let id = registry.mint(OWNER, MonsterTypeId(0), &catalog).unwrap();

        registry.set_monster_health(OWNER, id, 250).unwrap();
        assert_eq!(registry.get(id).unwrap().health, 250);

        assert!(matches!(
            registry.set_monster_health(OTHER, id, 10),
            Err(RegistryError::NotAuthorized { .. })
        ));
        assert!(matches!(
            registry.set_monster_health(OWNER, id, 1001),
            Err(RegistryError::HealthAboveMax { max_health: 1000, .. })
        ));
        assert_eq!(registry.get(id).unwrap().health, 250);
    }

    #[test]
    fn cooldown_prefix_updates_and_length_check() {
        let catalog = catalog();
        let mut registry = InMemoryMonsterRegistry::new();
        let id = registry.mint(OWNER, MonsterTypeId(0), &catalog).unwrap();

        registry
            .set_monster_cooldowns(OWNER, id, &[0, 2], &catalog)
            .unwrap();
        registry
            .set_monster_cooldowns(OWNER, id, &[1], &catalog)
            .unwrap();
        assert_eq!(registry.get(id).unwrap().cooldowns.as_slice(), &[1, 2]);

        let err = registry
            .set_monster_cooldowns(OWNER, id, &[0, 0, 0], &catalog)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::CooldownLength {
                expected: 2,
                provided: 3
            }
        );
    }

    #[test]
    fn cooldowns_grow_with_the_skill_set() {
        let catalog = catalog();
        let mut registry = InMemoryMonsterRegistry::new();
        let id = registry.mint(OWNER, MonsterTypeId(0), &catalog).unwrap();

        catalog
            .add_skill_to_type(MonsterTypeId(0), SkillId(0))
            .unwrap();
        registry
            .set_monster_cooldowns(OWNER, id, &[0, 0, 3], &catalog)
            .unwrap();
        assert_eq!(registry.get(id).unwrap().cooldowns.as_slice(), &[0, 0, 3]);
    }

    #[test]
    fn cooldowns_follow_their_skills_when_the_set_changes() {
        let catalog = catalog();
        let mut registry = InMemoryMonsterRegistry::new();
        let dragon = MonsterTypeId(0);
        let first = registry.mint(OWNER, dragon, &catalog).unwrap();
        let second = registry.mint(OTHER, dragon, &catalog).unwrap();
        registry
            .set_monster_cooldowns(OWNER, first, &[1, 3], &catalog)
            .unwrap();

        registry.realign_cooldowns(
            dragon,
            &[SkillId(0), SkillId(1)],
            &[SkillId(1), SkillId(2), SkillId(0)],
        );
        assert_eq!(registry.get(first).unwrap().cooldowns.as_slice(), &[3, 0, 1]);
        assert_eq!(registry.get(second).unwrap().cooldowns.as_slice(), &[0, 0, 0]);

        registry.remove_cooldown_slot(dragon, 0);
        assert_eq!(registry.get(first).unwrap().cooldowns.as_slice(), &[0, 1]);
        registry.remove_cooldown_slot(dragon, 7);
        assert_eq!(registry.get(first).unwrap().cooldowns.as_slice(), &[0, 1]);
    }

    #[test]
    fn unknown_monster_is_not_found() {
        let registry = InMemoryMonsterRegistry::new();
        assert_eq!(
            registry.monster(MonsterId(3)),
            Err(RegistryError::NotFound(MonsterId(3)))
        );
    }
}
