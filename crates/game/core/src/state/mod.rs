//! Authoritative arena state representation.
//!
//! Monster records are owned by the registry collaborator; battles and
//! tournaments are owned by the engine and the manager respectively. Runtime
//! layers clone or query these records but mutate them exclusively through the
//! rules in this crate.
pub mod types;

pub use types::{
    Battle, BattleId, BattleKind, BattleSide, BattleStatus, Cooldowns, MonsterId, MonsterInstance,
    MonsterTypeId, Player, PlayerId, Roster, Side, SkillId, SkillSet, Tournament, TournamentId,
    TournamentStatus,
};
