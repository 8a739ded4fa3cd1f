//! [`arena_core::CatalogOracle`] backed by in-memory tables.

use std::sync::RwLock;

use arena_content::CatalogContent;
use arena_core::{
    ArenaConfig, CatalogError, CatalogOracle, MonsterType, MonsterTypeId, Skill, SkillId,
};

use super::error::{OracleError, Result};

/// Monster types and skills, addressed by their position.
///
/// Ids are sequential from 0 and never reused; updates replace an entry in
/// place.
#[derive(Debug, Default)]
pub struct CatalogOracleImpl {
    monster_types: RwLock<Vec<MonsterType>>,
    skills: RwLock<Vec<Skill>>,
}

impl CatalogOracleImpl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the catalog from loaded content, keeping its ids.
    pub fn from_content(content: CatalogContent) -> Self {
        Self {
            monster_types: RwLock::new(
                content
                    .monster_types
                    .into_iter()
                    .map(|(_, monster_type)| monster_type)
                    .collect(),
            ),
            skills: RwLock::new(content.skills.into_iter().map(|(_, skill)| skill).collect()),
        }
    }

    pub fn add_monster_type(&self, monster_type: MonsterType) -> Result<MonsterTypeId> {
        let mut types = self
            .monster_types
            .write()
            .map_err(|_| OracleError::LockPoisoned)?;
        types.push(monster_type);
        Ok(MonsterTypeId((types.len() - 1) as u32))
    }

    pub fn update_monster_type(&self, id: MonsterTypeId, monster_type: MonsterType) -> Result<()> {
        let mut types = self
            .monster_types
            .write()
            .map_err(|_| OracleError::LockPoisoned)?;
        let slot = types
            .get_mut(id.0 as usize)
            .ok_or(CatalogError::MonsterTypeNotFound(id))?;
        *slot = monster_type;
        Ok(())
    }

    pub fn add_skill(&self, skill: Skill) -> Result<SkillId> {
        let mut skills = self.skills.write().map_err(|_| OracleError::LockPoisoned)?;
        skills.push(skill);
        Ok(SkillId((skills.len() - 1) as u32))
    }

    pub fn update_skill(&self, id: SkillId, skill: Skill) -> Result<()> {
        let mut skills = self.skills.write().map_err(|_| OracleError::LockPoisoned)?;
        let slot = skills
            .get_mut(id.0 as usize)
            .ok_or(CatalogError::SkillNotFound(id))?;
        *slot = skill;
        Ok(())
    }

    /// Appends `skill` to the type's skill set.
    ///
    /// # Errors
    ///
    /// `MonsterTypeNotFound`, `SkillNotFound`, or `SkillSetFull` once the set
    /// holds [`ArenaConfig::MAX_SKILLS`] skills.
    pub fn add_skill_to_type(&self, type_id: MonsterTypeId, skill: SkillId) -> Result<()> {
        let skill_known = {
            let skills = self.skills.read().map_err(|_| OracleError::LockPoisoned)?;
            (skill.0 as usize) < skills.len()
        };
        if !skill_known {
            return Err(CatalogError::SkillNotFound(skill).into());
        }

        let mut types = self
            .monster_types
            .write()
            .map_err(|_| OracleError::LockPoisoned)?;
        let monster_type = types
            .get_mut(type_id.0 as usize)
            .ok_or(CatalogError::MonsterTypeNotFound(type_id))?;
        if monster_type.skill_set.len() >= ArenaConfig::MAX_SKILLS {
            return Err(CatalogError::SkillSetFull(type_id).into());
        }
        monster_type.skill_set.push(skill);
        Ok(())
    }

    /// Removes the skill at `index` from the type's skill set, shifting later
    /// skills down by one. Returns the removed skill.
    pub fn remove_skill_from_type(&self, type_id: MonsterTypeId, index: usize) -> Result<SkillId> {
        let mut types = self
            .monster_types
            .write()
            .map_err(|_| OracleError::LockPoisoned)?;
        let monster_type = types
            .get_mut(type_id.0 as usize)
            .ok_or(CatalogError::MonsterTypeNotFound(type_id))?;
        if index >= monster_type.skill_set.len() {
            return Err(CatalogError::SkillIndexOutOfRange { type_id, index }.into());
        }
        Ok(monster_type.skill_set.remove(index))
    }

    pub fn list_monster_types(&self) -> Result<Vec<(MonsterTypeId, MonsterType)>> {
        let types = self
            .monster_types
            .read()
            .map_err(|_| OracleError::LockPoisoned)?;
        Ok(types
            .iter()
            .enumerate()
            .map(|(index, monster_type)| (MonsterTypeId(index as u32), monster_type.clone()))
            .collect())
    }

    pub fn list_skills(&self) -> Result<Vec<(SkillId, Skill)>> {
        let skills = self.skills.read().map_err(|_| OracleError::LockPoisoned)?;
        Ok(skills
            .iter()
            .enumerate()
            .map(|(index, skill)| (SkillId(index as u32), skill.clone()))
            .collect())
    }
}

impl CatalogOracle for CatalogOracleImpl {
    fn monster_type(&self, id: MonsterTypeId) -> Option<MonsterType> {
        self.monster_types.read().ok()?.get(id.0 as usize).cloned()
    }

    fn skill(&self, id: SkillId) -> Option<Skill> {
        self.skills.read().ok()?.get(id.0 as usize).cloned()
    }
}
