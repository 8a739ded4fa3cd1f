//! Error types for the combat engine.

use crate::config::ArenaConfig;
use crate::env::{CatalogError, RegistryError};
use crate::error::{ArenaError, ErrorKind};
use crate::state::{BattleId, BattleStatus, MonsterId, PlayerId, SkillId};
use crate::tournament::TournamentError;

/// Why a skill was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillRejection {
    /// The skill is not part of the attacker's type skill set.
    NotInSkillSet,
    /// The skill is still cooling down.
    OnCooldown { remaining: u32 },
}

/// Errors surfaced by battle operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleError {
    #[error("{}", roster_size_message(.len))]
    InvalidRosterSize { len: usize },

    #[error("monster {0} appears more than once in the roster")]
    DuplicateMonster(MonsterId),

    #[error("{player} does not own monster {monster}")]
    NotOwner { player: PlayerId, monster: MonsterId },

    #[error("{0} cannot battle themselves")]
    SelfMatch(PlayerId),

    #[error("{player} is already waiting in battle {battle}")]
    AlreadyWaiting { player: PlayerId, battle: BattleId },

    #[error("monster {monster} is already fighting in battle {battle}")]
    MonsterBusy { monster: MonsterId, battle: BattleId },

    #[error("battle {0} not found")]
    BattleNotFound(BattleId),

    #[error("battle {battle} is not active (status: {status})")]
    BattleNotActive {
        battle: BattleId,
        status: BattleStatus,
    },

    #[error("it is not {player}'s turn in battle {battle}")]
    NotYourTurn { player: PlayerId, battle: BattleId },

    #[error("monster {0} cannot act this turn")]
    InvalidAttacker(MonsterId),

    #[error("skill {skill} cannot be used by monster {monster}: {reason:?}")]
    InvalidSkill {
        skill: SkillId,
        monster: MonsterId,
        reason: SkillRejection,
    },

    #[error("monster {0} is not a valid target")]
    InvalidTarget(MonsterId),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("battle outcome was rejected by its organizer: {0}")]
    OutcomeRejected(Box<TournamentError>),
}

fn roster_size_message(len: &usize) -> String {
    if *len == 0 {
        "you must have at least one monster to start a battle".to_string()
    } else {
        format!(
            "a maximum of {} monsters can participate in a battle (got {len})",
            ArenaConfig::MAX_ROSTER
        )
    }
}

impl ArenaError for BattleError {
    fn kind(&self) -> ErrorKind {
        use BattleError::*;
        match self {
            InvalidRosterSize { .. }
            | DuplicateMonster(_)
            | SelfMatch(_)
            | InvalidAttacker(_)
            | InvalidSkill { .. }
            | InvalidTarget(_) => ErrorKind::Validation,
            NotOwner { .. } | NotYourTurn { .. } => ErrorKind::Authorization,
            AlreadyWaiting { .. } | MonsterBusy { .. } | BattleNotActive { .. } => {
                ErrorKind::StateConflict
            }
            BattleNotFound(_) => ErrorKind::NotFound,
            Catalog(error) => error.kind(),
            Registry(error) => error.kind(),
            OutcomeRejected(_) => ErrorKind::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use BattleError::*;
        match self {
            InvalidRosterSize { .. } => "BATTLE_INVALID_ROSTER_SIZE",
            DuplicateMonster(_) => "BATTLE_DUPLICATE_MONSTER",
            NotOwner { .. } => "BATTLE_NOT_OWNER",
            SelfMatch(_) => "BATTLE_SELF_MATCH",
            AlreadyWaiting { .. } => "BATTLE_ALREADY_WAITING",
            MonsterBusy { .. } => "BATTLE_MONSTER_BUSY",
            BattleNotFound(_) => "BATTLE_NOT_FOUND",
            BattleNotActive { .. } => "BATTLE_NOT_ACTIVE",
            NotYourTurn { .. } => "BATTLE_NOT_YOUR_TURN",
            InvalidAttacker(_) => "BATTLE_INVALID_ATTACKER",
            InvalidSkill { .. } => "BATTLE_INVALID_SKILL",
            InvalidTarget(_) => "BATTLE_INVALID_TARGET",
            Catalog(error) => error.error_code(),
            Registry(error) => error.error_code(),
            OutcomeRejected(_) => "BATTLE_OUTCOME_REJECTED",
        }
    }
}
