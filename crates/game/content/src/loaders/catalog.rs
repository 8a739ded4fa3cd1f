//! Monster type and skill catalog loader.

use std::path::Path;

use arena_core::{ArenaConfig, MonsterType, MonsterTypeId, Skill, SkillId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Monster type as written in catalog files.
///
/// `skills` lists indices into the catalog's `skills` array, in skill-set
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterTypeEntry {
    pub name: String,
    pub base_attack: u32,
    pub base_health: u32,
    pub attack_growth_percent: u32,
    pub health_growth_percent: u32,
    #[serde(default)]
    pub skills: Vec<u32>,
}

/// Catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub monster_types: Vec<MonsterTypeEntry>,
}

/// Catalog content with identifiers assigned in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogContent {
    pub skills: Vec<(SkillId, Skill)>,
    pub monster_types: Vec<(MonsterTypeId, MonsterType)>,
}

/// Loader for the monster catalog from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load the catalog from a RON file.
    ///
    /// Skills and monster types receive sequential ids starting at 0, in the
    /// order they appear in the file.
    pub fn load(path: &Path) -> LoadResult<CatalogContent> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse catalog RON text.
    pub fn parse(content: &str) -> LoadResult<CatalogContent> {
        let file: CatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        let skills: Vec<(SkillId, Skill)> = file
            .skills
            .into_iter()
            .enumerate()
            .map(|(index, skill)| (SkillId(index as u32), skill))
            .collect();

        let mut monster_types = Vec::with_capacity(file.monster_types.len());
        for (index, entry) in file.monster_types.into_iter().enumerate() {
            if entry.skills.len() > ArenaConfig::MAX_SKILLS {
                anyhow::bail!(
                    "Monster type '{}' lists {} skills (max {})",
                    entry.name,
                    entry.skills.len(),
                    ArenaConfig::MAX_SKILLS
                );
            }

            let mut monster_type = MonsterType::new(
                entry.name.clone(),
                entry.base_attack,
                entry.base_health,
                entry.attack_growth_percent,
                entry.health_growth_percent,
            );
            for skill in entry.skills {
                if skill as usize >= skills.len() {
                    anyhow::bail!(
                        "Monster type '{}' references unknown skill {}",
                        entry.name,
                        skill
                    );
                }
                monster_type = monster_type.with_skill(SkillId(skill));
            }

            monster_types.push((MonsterTypeId(index as u32), monster_type));
        }

        Ok(CatalogContent {
            skills,
            monster_types,
        })
    }
}
