//! Runtime implementation of the monster catalog.
//!
//! The catalog is shared behind an `Arc`: the worker reads it through
//! [`arena_core::CatalogOracle`] while administrative writes are routed
//! through the worker so they never interleave with a running command.
mod catalog;
mod error;

pub use catalog::CatalogOracleImpl;
pub use error::OracleError;
