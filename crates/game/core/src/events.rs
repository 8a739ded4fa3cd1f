//! Notifications and battle outcome hand-off.
//!
//! Notifications are fire-and-forget records emitted in call order. The rules
//! push them into a [`NotificationSink`]; the runtime forwards them onto its
//! event bus, tests collect them in a `Vec`.
//!
//! [`BattleOutcomeListener`] is the explicit hand-off from the combat engine
//! to whoever organized the battle (the tournament manager). The engine holds
//! a reference to the listener for the duration of a skill call and reports
//! terminal outcomes through it.

use crate::engine::BattleOpener;
use crate::env::SkillType;
use crate::state::{BattleId, BattleKind, MonsterId, PlayerId, TournamentId};
use crate::tournament::TournamentError;

/// Observable record of a state change.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    /// A battle was opened (`side_b` empty) or both seats were filled.
    BattleCreated {
        side_a: PlayerId,
        side_b: Option<PlayerId>,
        battle: BattleId,
    },
    SkillUsed {
        actor: PlayerId,
        attacker: MonsterId,
        target: MonsterId,
        skill_type: SkillType,
        amount: u32,
    },
    BattleEnded {
        winner: PlayerId,
        battle: BattleId,
    },
    TournamentCreated {
        tournament: TournamentId,
        host: PlayerId,
    },
    PlayerJoined {
        tournament: TournamentId,
        player: PlayerId,
    },
    PlayerReady {
        tournament: TournamentId,
        player: PlayerId,
    },
    TournamentRoundStarted {
        tournament: TournamentId,
        round: u32,
    },
    PlayerEliminated {
        tournament: TournamentId,
        player: PlayerId,
    },
    TournamentEnded {
        tournament: TournamentId,
        champion: PlayerId,
    },
}

impl Notification {
    /// Short name used in logs and topic routing.
    pub fn name(&self) -> &'static str {
        match self {
            Notification::BattleCreated { .. } => "battle_created",
            Notification::SkillUsed { .. } => "skill_used",
            Notification::BattleEnded { .. } => "battle_ended",
            Notification::TournamentCreated { .. } => "tournament_created",
            Notification::PlayerJoined { .. } => "player_joined",
            Notification::PlayerReady { .. } => "player_ready",
            Notification::TournamentRoundStarted { .. } => "tournament_round_started",
            Notification::PlayerEliminated { .. } => "player_eliminated",
            Notification::TournamentEnded { .. } => "tournament_ended",
        }
    }

    /// True for notifications about the battle lifecycle.
    pub fn is_battle(&self) -> bool {
        matches!(
            self,
            Notification::BattleCreated { .. }
                | Notification::SkillUsed { .. }
                | Notification::BattleEnded { .. }
        )
    }
}

/// Receiver of notifications.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Terminal result of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleOutcome {
    pub battle: BattleId,
    pub kind: BattleKind,
    pub winner: PlayerId,
    pub loser: PlayerId,
}

/// Receives terminal battle outcomes from the combat engine.
///
/// `opener` lets the listener open follow-up battles (the next tournament
/// round) and emit its own notifications within the same call.
pub trait BattleOutcomeListener {
    fn battle_ended(
        &mut self,
        outcome: &BattleOutcome,
        opener: &mut dyn BattleOpener,
    ) -> Result<(), TournamentError>;
}

/// Listener for battles nobody organized (casual and private matches).
#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreOutcomes;

impl BattleOutcomeListener for IgnoreOutcomes {
    fn battle_ended(
        &mut self,
        _outcome: &BattleOutcome,
        _opener: &mut dyn BattleOpener,
    ) -> Result<(), TournamentError> {
        Ok(())
    }
}
