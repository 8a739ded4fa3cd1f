//! Worker tasks that back the runtime orchestration.
//!
//! A single arena worker executes every state-changing command in arrival
//! order.

mod arena;

pub use arena::{ArenaWorker, CatalogCommand, Command};
