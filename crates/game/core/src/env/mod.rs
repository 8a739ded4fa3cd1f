//! Traits describing the arena's collaborators.
//!
//! The catalog exposes static monster types and skills; the registry exposes
//! mutable monster records. [`ArenaEnv`] bundles the read-only half so the
//! rules can reach everything they need without coupling to concrete
//! implementations.
mod catalog;
mod error;
mod registry;

pub use catalog::{CatalogOracle, MonsterType, Skill, SkillType};
pub use error::{CatalogError, RegistryError};
pub use registry::MonsterRegistry;

use crate::config::ArenaConfig;
use crate::state::{MonsterTypeId, SkillId};

/// Aggregates read-only collaborators required by the rules.
#[derive(Clone, Copy)]
pub struct ArenaEnv<'a> {
    catalog: &'a dyn CatalogOracle,
    config: &'a ArenaConfig,
}

impl<'a> ArenaEnv<'a> {
    pub fn new(catalog: &'a dyn CatalogOracle, config: &'a ArenaConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a dyn CatalogOracle {
        self.catalog
    }

    pub fn config(&self) -> &'a ArenaConfig {
        self.config
    }

    /// Returns the monster type, or an error if the catalog does not know it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::MonsterTypeNotFound` for unknown ids.
    pub fn monster_type(&self, id: MonsterTypeId) -> Result<MonsterType, CatalogError> {
        self.catalog
            .monster_type(id)
            .ok_or(CatalogError::MonsterTypeNotFound(id))
    }

    /// Returns the skill, or an error if the catalog does not know it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SkillNotFound` for unknown ids.
    pub fn skill(&self, id: SkillId) -> Result<Skill, CatalogError> {
        self.catalog.skill(id).ok_or(CatalogError::SkillNotFound(id))
    }
}

impl core::fmt::Debug for ArenaEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArenaEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
