//! Error types for the tournament manager.

use crate::config::ArenaConfig;
use crate::engine::BattleError;
use crate::env::RegistryError;
use crate::error::{ArenaError, ErrorKind};
use crate::state::{BattleId, MonsterId, PlayerId, TournamentId, TournamentStatus};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TournamentError {
    #[error(
        "tournament size {0} must be a power of two between 2 and {max}",
        max = ArenaConfig::MAX_TOURNAMENT_PLAYERS
    )]
    InvalidSize(u32),

    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("tournament {tournament} is no longer pending (status: {status})")]
    NotPending {
        tournament: TournamentId,
        status: TournamentStatus,
    },

    #[error("tournament {tournament} is full ({max} players)")]
    TournamentFull { tournament: TournamentId, max: u32 },

    #[error("{player} already joined tournament {tournament}")]
    AlreadyJoined {
        tournament: TournamentId,
        player: PlayerId,
    },

    #[error("{player} is not a participant of tournament {tournament}")]
    NotAParticipant {
        tournament: TournamentId,
        player: PlayerId,
    },

    #[error("{player} does not own monster {monster}")]
    NotOwner { player: PlayerId, monster: MonsterId },

    #[error(
        "a tournament roster needs 1 to {max} monsters (got {len})",
        max = ArenaConfig::MAX_ROSTER
    )]
    InvalidRosterSize { len: usize },

    #[error("monster {0} appears more than once in the roster")]
    DuplicateMonster(MonsterId),

    #[error("{player} cannot be ready in tournament {tournament} without monsters")]
    EmptyRoster {
        tournament: TournamentId,
        player: PlayerId,
    },

    #[error("only the host can start tournament {tournament}, not {caller}")]
    NotHost {
        tournament: TournamentId,
        caller: PlayerId,
    },

    #[error("tournament {tournament} has {joined} of {max} players")]
    NotFull {
        tournament: TournamentId,
        joined: u32,
        max: u32,
    },

    #[error("not every player of tournament {0} is ready")]
    NotAllReady(TournamentId),

    #[error("battle {battle} is not pending in tournament {tournament}")]
    UnexpectedBattle {
        tournament: TournamentId,
        battle: BattleId,
    },

    #[error("failed to open a bracket battle: {0}")]
    OpenBattle(#[from] BattleError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ArenaError for TournamentError {
    fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            InvalidSize(_)
            | InvalidRosterSize { .. }
            | DuplicateMonster(_)
            | EmptyRoster { .. } => ErrorKind::Validation,
            NotAParticipant { .. } | NotOwner { .. } | NotHost { .. } => {
                ErrorKind::Authorization
            }
            NotPending { .. }
            | TournamentFull { .. }
            | AlreadyJoined { .. }
            | NotFull { .. }
            | NotAllReady(_) => ErrorKind::StateConflict,
            TournamentNotFound(_) => ErrorKind::NotFound,
            UnexpectedBattle { .. } => ErrorKind::Internal,
            OpenBattle(error) => error.kind(),
            Registry(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        use TournamentError::*;
        match self {
            InvalidSize(_) => "TOURNAMENT_INVALID_SIZE",
            TournamentNotFound(_) => "TOURNAMENT_NOT_FOUND",
            NotPending { .. } => "TOURNAMENT_NOT_PENDING",
            TournamentFull { .. } => "TOURNAMENT_FULL",
            AlreadyJoined { .. } => "TOURNAMENT_ALREADY_JOINED",
            NotAParticipant { .. } => "TOURNAMENT_NOT_A_PARTICIPANT",
            NotOwner { .. } => "TOURNAMENT_NOT_OWNER",
            InvalidRosterSize { .. } => "TOURNAMENT_INVALID_ROSTER_SIZE",
            DuplicateMonster(_) => "TOURNAMENT_DUPLICATE_MONSTER",
            EmptyRoster { .. } => "TOURNAMENT_EMPTY_ROSTER",
            NotHost { .. } => "TOURNAMENT_NOT_HOST",
            NotFull { .. } => "TOURNAMENT_NOT_FULL",
            NotAllReady(_) => "TOURNAMENT_NOT_ALL_READY",
            UnexpectedBattle { .. } => "TOURNAMENT_UNEXPECTED_BATTLE",
            OpenBattle(error) => error.error_code(),
            Registry(error) => error.error_code(),
        }
    }
}
