//! Runtime orchestration for the monster arena.
//!
//! This crate wires the deterministic rules of `arena-core` to in-memory
//! collaborators, a topic-based event bus and a single worker task that
//! serializes every state-changing request. Consumers embed [`Runtime`] and
//! interact with the arena through the cloneable [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`oracle`] holds the administrable monster catalog
//! - [`repository`] holds the monster registry
//! - `workers` keeps the arena worker internal to the crate
pub mod api;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;
pub mod state;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use events::{Event, EventBus, MonsterEvent, Topic};
pub use oracle::{CatalogOracleImpl, OracleError};
pub use repository::InMemoryMonsterRegistry;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use state::ArenaState;
