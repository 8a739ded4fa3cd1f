//! Topic-based event bus for runtime events.
//!
//! Notifications emitted by the rules are routed to the battle or tournament
//! topic; registry activity (minting, experience) goes to the monster topic.
//! Consumers subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::MonsterEvent;
