//! Error types raised by the catalog implementation.

use arena_core::{ArenaError, CatalogError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("catalog lock was poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl ArenaError for OracleError {
    fn kind(&self) -> ErrorKind {
        match self {
            OracleError::LockPoisoned => ErrorKind::Internal,
            OracleError::Catalog(error) => error.kind(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            OracleError::LockPoisoned => "ORACLE_LOCK_POISONED",
            OracleError::Catalog(error) => error.error_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OracleError>;
