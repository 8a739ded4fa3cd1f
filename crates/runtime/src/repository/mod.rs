//! Repository layer for monster records.
//!
//! Monster records change during play (health, cooldowns, experience), so
//! they live here rather than in the catalog oracle, which only holds static
//! type and skill content.

mod monster;

pub use monster::InMemoryMonsterRegistry;
