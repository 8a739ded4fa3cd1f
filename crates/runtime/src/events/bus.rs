//! Topic-based event bus implementation.

use std::collections::HashMap;

use arena_core::Notification;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::MonsterEvent;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle lifecycle (created, skill used, ended)
    Battle,
    /// Tournament lifecycle (joins, rounds, eliminations)
    Tournament,
    /// Monster registry changes
    Monster,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Battle(Notification),
    Tournament(Notification),
    Monster(MonsterEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Battle(_) => Topic::Battle,
            Event::Tournament(_) => Topic::Tournament,
            Event::Monster(_) => Topic::Monster,
        }
    }

    /// The core notification carried by this event, if any.
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Event::Battle(notification) | Event::Tournament(notification) => Some(notification),
            Event::Monster(_) => None,
        }
    }
}

impl From<Notification> for Event {
    fn from(notification: Notification) -> Self {
        if notification.is_battle() {
            Event::Battle(notification)
        } else {
            Event::Tournament(notification)
        }
    }
}

impl From<MonsterEvent> for Event {
    fn from(event: MonsterEvent) -> Self {
        Event::Monster(event)
    }
}

/// Topic-based event bus
///
/// Every topic has its own broadcast channel, created up front. Cloning the
/// bus shares the channels.
#[derive(Clone)]
pub struct EventBus {
    battle: broadcast::Sender<Event>,
    tournament: broadcast::Sender<Event>,
    monster: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            battle: broadcast::channel(capacity).0,
            tournament: broadcast::channel(capacity).0,
            monster: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Battle => &self.battle,
            Topic::Tournament => &self.tournament,
            Topic::Monster => &self.monster,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("battle_subscribers", &self.battle.receiver_count())
            .field("tournament_subscribers", &self.tournament.receiver_count())
            .field("monster_subscribers", &self.monster.receiver_count())
            .finish()
    }
}
