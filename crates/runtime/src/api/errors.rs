//! Unified error types surfaced by the runtime API.
//!
//! Wraps rule rejections from `arena-core` and failures of worker
//! coordination so clients can bubble them up with consistent context.

use arena_core::{
    ArenaError, BattleError, CatalogError, ErrorKind, LevelingError, RegistryError,
    TournamentError,
};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::oracle::OracleError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("arena worker command channel closed")]
    CommandChannelClosed,

    #[error("arena worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("arena worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error(transparent)]
    Tournament(#[from] TournamentError),

    #[error(transparent)]
    Leveling(#[from] LevelingError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl From<CatalogError> for RuntimeError {
    fn from(error: CatalogError) -> Self {
        RuntimeError::Oracle(OracleError::Catalog(error))
    }
}

impl RuntimeError {
    /// Returns the wrapped battle error, if any.
    pub fn as_battle(&self) -> Option<&BattleError> {
        match self {
            RuntimeError::Battle(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_tournament(&self) -> Option<&TournamentError> {
        match self {
            RuntimeError::Tournament(error) => Some(error),
            _ => None,
        }
    }

    pub fn as_leveling(&self) -> Option<&LevelingError> {
        match self {
            RuntimeError::Leveling(error) => Some(error),
            _ => None,
        }
    }
}

impl ArenaError for RuntimeError {
    fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorKind::Internal,
            RuntimeError::Battle(error) => error.kind(),
            RuntimeError::Tournament(error) => error.kind(),
            RuntimeError::Leveling(error) => error.kind(),
            RuntimeError::Registry(error) => error.kind(),
            RuntimeError::Oracle(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::Battle(error) => error.error_code(),
            RuntimeError::Tournament(error) => error.error_code(),
            RuntimeError::Leveling(error) => error.error_code(),
            RuntimeError::Registry(error) => error.error_code(),
            RuntimeError::Oracle(error) => error.error_code(),
        }
    }
}
