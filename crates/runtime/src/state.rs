//! Mutable arena state owned by the worker.

use arena_core::{
    Battle, BattleBook, BattleError, BattleId, MonsterId, MonsterInstance, Player, PlayerId,
};
use arena_core::{Tournament, TournamentId, TournamentManager};

use crate::repository::InMemoryMonsterRegistry;

/// Everything the arena mutates: battles, tournaments and monster records.
///
/// The worker applies each command to a clone of this value and replaces the
/// original only when the command succeeds.
#[derive(Clone, Debug, Default)]
pub struct ArenaState {
    pub battles: BattleBook,
    pub tournaments: TournamentManager,
    pub registry: InMemoryMonsterRegistry,
}

impl ArenaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn battle(&self, id: BattleId) -> Option<&Battle> {
        self.battles.battle(id)
    }

    pub fn tournament(&self, id: TournamentId) -> Option<&Tournament> {
        self.tournaments.tournament(id)
    }

    pub fn player(&self, tournament: TournamentId, player: PlayerId) -> Option<&Player> {
        self.tournaments.player(tournament, player)
    }

    pub fn monster(&self, id: MonsterId) -> Option<&MonsterInstance> {
        self.registry.get(id)
    }

    /// Fails with `MonsterBusy` while `monster` is fielded in a battle that
    /// has not ended. Only the combat engine writes to such a monster.
    pub fn ensure_idle(&self, monster: MonsterId) -> Result<(), BattleError> {
        match self.battles.engagement(monster) {
            Some(battle) => Err(BattleError::MonsterBusy { monster, battle }),
            None => Ok(()),
        }
    }
}
