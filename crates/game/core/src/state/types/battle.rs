//! Battle records owned by the combat engine.

use arrayvec::ArrayVec;

use crate::config::ArenaConfig;

use super::common::{BattleId, MonsterId, PlayerId, TournamentId};

/// Monsters a side brings into a battle, in the order they fight.
pub type Roster = ArrayVec<MonsterId, { ArenaConfig::MAX_ROSTER }>;

/// One of the two seats of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    A,
    B,
}

impl Side {
    /// Returns the other seat.
    pub const fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Lifecycle of a battle. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleStatus {
    WaitingForOpponent,
    Active,
    Ended,
}

/// How a battle was created, which decides who may fill seat B.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleKind {
    /// Casual matchmaking: the first caller from the queue takes seat B.
    Public,
    /// Seat B is reserved for one invited player.
    Private { invited: PlayerId },
    /// Opened by a tournament round with both seats filled.
    Scheduled {
        tournament: TournamentId,
        round: u32,
    },
}

/// A seated player and the roster they fight with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSide {
    pub player: PlayerId,
    pub monsters: Roster,
    /// Index into `monsters` of the monster currently fighting.
    pub active: usize,
}

impl BattleSide {
    pub fn new(player: PlayerId, monsters: Roster) -> Self {
        Self {
            player,
            monsters,
            active: 0,
        }
    }

    /// The monster currently fighting for this side.
    pub fn active_monster(&self) -> Option<MonsterId> {
        self.monsters.get(self.active).copied()
    }

    pub fn contains(&self, monster: MonsterId) -> bool {
        self.monsters.contains(&monster)
    }
}

/// Two-sided turn-based combat session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Battle {
    pub id: BattleId,
    pub kind: BattleKind,
    pub side_a: BattleSide,
    /// Empty while the battle waits for an opponent.
    pub side_b: Option<BattleSide>,
    pub turn_owner: Side,
    pub status: BattleStatus,
    pub winner: Option<PlayerId>,
}

impl Battle {
    /// Opens a battle with only seat A filled.
    pub fn open(id: BattleId, kind: BattleKind, side_a: BattleSide) -> Self {
        Self {
            id,
            kind,
            side_a,
            side_b: None,
            turn_owner: Side::A,
            status: BattleStatus::WaitingForOpponent,
            winner: None,
        }
    }

    pub fn side(&self, side: Side) -> Option<&BattleSide> {
        match side {
            Side::A => Some(&self.side_a),
            Side::B => self.side_b.as_ref(),
        }
    }

    pub fn side_mut(&mut self, side: Side) -> Option<&mut BattleSide> {
        match side {
            Side::A => Some(&mut self.side_a),
            Side::B => self.side_b.as_mut(),
        }
    }

    /// Returns the seat occupied by `player`, if any.
    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if self.side_a.player == player {
            Some(Side::A)
        } else if self.side_b.as_ref().is_some_and(|side| side.player == player) {
            Some(Side::B)
        } else {
            None
        }
    }

    /// Player seated on the opposite side of `player`.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        let side = self.side_of(player)?;
        self.side(side.opposite()).map(|side| side.player)
    }

    /// Tournament that scheduled this battle, if any.
    pub fn tournament(&self) -> Option<TournamentId> {
        match self.kind {
            BattleKind::Scheduled { tournament, .. } => Some(tournament),
            _ => None,
        }
    }

    /// True if `monster` is in either roster.
    pub fn fields(&self, monster: MonsterId) -> bool {
        self.side_a.contains(monster)
            || self
                .side_b
                .as_ref()
                .is_some_and(|side| side.contains(monster))
    }

    pub fn is_open(&self) -> bool {
        self.status == BattleStatus::WaitingForOpponent
    }

    pub fn is_active(&self) -> bool {
        self.status == BattleStatus::Active
    }

    pub fn is_ended(&self) -> bool {
        self.status == BattleStatus::Ended
    }
}
