//! In-memory collaborators shared by the unit tests.

use std::collections::BTreeMap;

use crate::config::ArenaConfig;
use crate::engine::{BattleBook, BattleEngine};
use crate::env::{ArenaEnv, CatalogOracle, MonsterRegistry, MonsterType, RegistryError, Skill};
use crate::events::Notification;
use crate::state::{Cooldowns, MonsterId, MonsterInstance, MonsterTypeId, PlayerId, SkillId};
use crate::stats::MonsterStats;

pub const ALICE: PlayerId = PlayerId(1);
pub const BOB: PlayerId = PlayerId(2);
pub const CAROL: PlayerId = PlayerId(3);
pub const DAVE: PlayerId = PlayerId(4);

#[derive(Default)]
pub struct TestCatalog {
    types: BTreeMap<MonsterTypeId, MonsterType>,
    skills: BTreeMap<SkillId, Skill>,
}

impl TestCatalog {
    pub fn add_type(&mut self, id: MonsterTypeId, monster_type: MonsterType) {
        self.types.insert(id, monster_type);
    }

    pub fn add_skill(&mut self, id: SkillId, skill: Skill) {
        self.skills.insert(id, skill);
    }
}

impl CatalogOracle for TestCatalog {
    fn monster_type(&self, id: MonsterTypeId) -> Option<MonsterType> {
        self.types.get(&id).cloned()
    }

    fn skill(&self, id: SkillId) -> Option<Skill> {
        self.skills.get(&id).cloned()
    }
}

#[derive(Default)]
pub struct TestRegistry {
    monsters: BTreeMap<MonsterId, MonsterInstance>,
}

impl TestRegistry {
    pub fn get(&self, id: MonsterId) -> &MonsterInstance {
        &self.monsters[&id]
    }

    pub fn get_mut(&mut self, id: MonsterId) -> &mut MonsterInstance {
        self.monsters.get_mut(&id).expect("monster exists")
    }
}

impl MonsterRegistry for TestRegistry {
    fn monster(&self, id: MonsterId) -> Result<MonsterInstance, RegistryError> {
        self.monsters
            .get(&id)
            .cloned()
            .ok_or(RegistryError::NotFound(id))
    }

    fn set_health(&mut self, id: MonsterId, health: u32) -> Result<(), RegistryError> {
        let monster = self.monsters.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        monster.health = health;
        Ok(())
    }

    fn set_cooldowns(&mut self, id: MonsterId, cooldowns: &Cooldowns) -> Result<(), RegistryError> {
        let monster = self.monsters.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        monster.cooldowns = cooldowns.clone();
        Ok(())
    }

    fn store_progress(&mut self, monster: &MonsterInstance) -> Result<(), RegistryError> {
        let stored = self
            .monsters
            .get_mut(&monster.id)
            .ok_or(RegistryError::NotFound(monster.id))?;
        *stored = monster.clone();
        Ok(())
    }
}

/// Everything a battle needs, owned in one place.
#[derive(Default)]
pub struct TestArena {
    pub catalog: TestCatalog,
    pub registry: TestRegistry,
    pub config: ArenaConfig,
    pub book: BattleBook,
    pub notifications: Vec<Notification>,
}

impl TestArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, owner: PlayerId, type_id: MonsterTypeId) -> MonsterId {
        let monster_type = self.catalog.types[&type_id].clone();
        let id = MonsterId(self.registry.monsters.len() as u32);
        let monster = MonsterInstance::new(
            id,
            owner,
            type_id,
            MonsterStats::base(&monster_type),
            monster_type.skill_set.len(),
        );
        self.registry.monsters.insert(id, monster);
        id
    }

    pub fn engine(&mut self) -> BattleEngine<'_> {
        BattleEngine::new(
            &mut self.book,
            &mut self.registry,
            ArenaEnv::new(&self.catalog, &self.config),
            &mut self.notifications,
        )
    }
}
