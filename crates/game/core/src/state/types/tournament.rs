//! Tournament records owned by the tournament manager.

use arrayvec::ArrayVec;

use crate::config::ArenaConfig;

use super::battle::Roster;
use super::common::{BattleId, PlayerId, TournamentId};

/// Lifecycle of a tournament. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TournamentStatus {
    Pending,
    Started,
    Ended,
}

/// Enrollment record of one participant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub id: PlayerId,
    pub is_eliminated: bool,
    pub is_in_battle: bool,
    pub is_ready: bool,
    pub monsters: Roster,
}

impl Player {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            is_eliminated: false,
            is_in_battle: false,
            is_ready: false,
            monsters: Roster::new(),
        }
    }
}

/// Single-elimination bracket.
///
/// `players` keeps join order, which doubles as the seed order used for
/// pairing every round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tournament {
    pub id: TournamentId,
    pub host: PlayerId,
    pub max_player_num: u32,
    pub current_round: u32,
    pub status: TournamentStatus,
    pub champion: Option<PlayerId>,
    pub players: ArrayVec<Player, { ArenaConfig::MAX_TOURNAMENT_PLAYERS }>,
    /// Battles of the current round that have not reported an outcome yet.
    pub pending_battles: ArrayVec<BattleId, { ArenaConfig::MAX_TOURNAMENT_PLAYERS / 2 }>,
}

impl Tournament {
    pub fn new(id: TournamentId, host: PlayerId, max_player_num: u32) -> Self {
        Self {
            id,
            host,
            max_player_num,
            current_round: 0,
            status: TournamentStatus::Pending,
            champion: None,
            players: ArrayVec::new(),
            pending_battles: ArrayVec::new(),
        }
    }

    /// Number of enrolled players.
    pub fn player_num(&self) -> u32 {
        self.players.len() as u32
    }

    pub fn is_full(&self) -> bool {
        self.player_num() >= self.max_player_num
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    pub fn all_ready(&self) -> bool {
        self.players.iter().all(|player| player.is_ready)
    }

    /// Players still in the bracket, in seed order.
    pub fn survivors(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|player| !player.is_eliminated)
    }
}
