//! Deterministic rules for the monster arena.
//!
//! `arena-core` defines the canonical data model (monsters, battles,
//! tournaments) and the three state machines that mutate it:
//! [`leveling`] for experience and stat growth, [`engine::BattleEngine`] for
//! turn-based combat and [`tournament::TournamentManager`] for
//! single-elimination brackets. Collaborators (type catalog, monster registry,
//! notification sink) are injected as traits from [`env`] and [`events`], so
//! the runtime and offline tools share exactly the same rules.
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod leveling;
pub mod state;
pub mod stats;
pub mod tournament;

#[cfg(test)]
mod testing;

pub use config::ArenaConfig;
pub use engine::{
    BattleBook, BattleEngine, BattleError, BattleOpener, Entrant, SkillOutcome, SkillRejection,
};
pub use env::{
    ArenaEnv, CatalogError, CatalogOracle, MonsterRegistry, MonsterType, RegistryError, Skill,
    SkillType,
};
pub use error::{ArenaError, ErrorKind};
pub use events::{
    BattleOutcome, BattleOutcomeListener, IgnoreOutcomes, Notification, NotificationSink,
};
pub use leveling::{LevelOutcome, LevelingError, reward_experience, reward_registered};
pub use state::{
    Battle, BattleId, BattleKind, BattleSide, BattleStatus, Cooldowns, MonsterId,
    MonsterInstance, MonsterTypeId, Player, PlayerId, Roster, Side, SkillId, SkillSet,
    Tournament, TournamentId, TournamentStatus,
};
pub use stats::MonsterStats;
pub use tournament::{TournamentError, TournamentManager};
