//! Collaborator access errors.

use crate::error::{ArenaError, ErrorKind};
use crate::state::{MonsterId, MonsterTypeId, PlayerId, SkillId};

/// Errors raised when catalog content is missing.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CatalogError {
    #[error("monster type {0} not found")]
    MonsterTypeNotFound(MonsterTypeId),

    #[error("skill {0} not found")]
    SkillNotFound(SkillId),

    #[error("skill set of monster type {0} is full")]
    SkillSetFull(MonsterTypeId),

    #[error("skill index {index} out of range for monster type {type_id}")]
    SkillIndexOutOfRange { type_id: MonsterTypeId, index: usize },
}

impl ArenaError for CatalogError {
    fn kind(&self) -> ErrorKind {
        use CatalogError::*;
        match self {
            MonsterTypeNotFound(_) | SkillNotFound(_) => ErrorKind::NotFound,
            SkillSetFull(_) | SkillIndexOutOfRange { .. } => ErrorKind::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use CatalogError::*;
        match self {
            MonsterTypeNotFound(_) => "CATALOG_MONSTER_TYPE_NOT_FOUND",
            SkillNotFound(_) => "CATALOG_SKILL_NOT_FOUND",
            SkillSetFull(_) => "CATALOG_SKILL_SET_FULL",
            SkillIndexOutOfRange { .. } => "CATALOG_SKILL_INDEX_OUT_OF_RANGE",
        }
    }
}

/// Errors raised by monster registry implementations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegistryError {
    #[error("monster {0} not found")]
    NotFound(MonsterId),

    #[error("{caller} is not authorized to modify monster {monster}")]
    NotAuthorized { caller: PlayerId, monster: MonsterId },

    #[error("monster limit of {limit} reached")]
    MonsterLimitReached { limit: usize },

    #[error("cooldown vector of length {provided} exceeds {expected} skill slots")]
    CooldownLength { expected: usize, provided: usize },

    #[error("health {health} exceeds maximum {max_health}")]
    HealthAboveMax { health: u32, max_health: u32 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ArenaError for RegistryError {
    fn kind(&self) -> ErrorKind {
        use RegistryError::*;
        match self {
            NotFound(_) => ErrorKind::NotFound,
            NotAuthorized { .. } => ErrorKind::Authorization,
            MonsterLimitReached { .. } => ErrorKind::StateConflict,
            CooldownLength { .. } | HealthAboveMax { .. } => ErrorKind::Validation,
            Catalog(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        use RegistryError::*;
        match self {
            NotFound(_) => "REGISTRY_NOT_FOUND",
            NotAuthorized { .. } => "REGISTRY_NOT_AUTHORIZED",
            MonsterLimitReached { .. } => "REGISTRY_MONSTER_LIMIT_REACHED",
            CooldownLength { .. } => "REGISTRY_COOLDOWN_LENGTH",
            HealthAboveMax { .. } => "REGISTRY_HEALTH_ABOVE_MAX",
            Catalog(error) => error.error_code(),
        }
    }
}
