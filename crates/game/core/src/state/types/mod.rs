pub mod battle;
pub mod common;
pub mod monster;
pub mod tournament;

// Re-export identifiers
pub use common::{BattleId, MonsterId, MonsterTypeId, PlayerId, SkillId, TournamentId};

// Re-export monster types
pub use monster::{Cooldowns, MonsterInstance, SkillSet};

// Re-export battle types
pub use battle::{Battle, BattleKind, BattleSide, BattleStatus, Roster, Side};

// Re-export tournament types
pub use tournament::{Player, Tournament, TournamentStatus};
