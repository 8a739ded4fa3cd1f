//! Battle storage and public matchmaking queue.

use std::collections::{BTreeMap, VecDeque};

use crate::state::{Battle, BattleId, BattleKind, MonsterId, PlayerId};

/// Every battle the engine has created, plus the FIFO queue of public
/// battles still waiting for an opponent.
///
/// Ended battles are kept for queries; nothing is ever removed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleBook {
    battles: BTreeMap<BattleId, Battle>,
    public_queue: VecDeque<BattleId>,
    next_id: BattleId,
}

impl BattleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn battle(&self, id: BattleId) -> Option<&Battle> {
        self.battles.get(&id)
    }

    pub fn battles(&self) -> impl Iterator<Item = &Battle> {
        self.battles.values()
    }

    pub fn len(&self) -> usize {
        self.battles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.battles.is_empty()
    }

    /// Public battles waiting for an opponent, oldest first.
    pub fn public_queue(&self) -> impl Iterator<Item = &Battle> {
        self.public_queue.iter().filter_map(|id| self.battles.get(id))
    }

    /// The public battle `player` is currently waiting in, if any.
    pub fn waiting_public(&self, player: PlayerId) -> Option<BattleId> {
        self.public_queue()
            .find(|battle| battle.side_a.player == player)
            .map(|battle| battle.id)
    }

    /// Oldest queued public battle opened by someone other than `caller`.
    pub fn next_public_for(&self, caller: PlayerId) -> Option<BattleId> {
        self.public_queue()
            .find(|battle| battle.side_a.player != caller)
            .map(|battle| battle.id)
    }

    /// Open private battle created by `creator` with seat B reserved for
    /// `invited`.
    pub fn private_invite(&self, creator: PlayerId, invited: PlayerId) -> Option<BattleId> {
        self.battles
            .values()
            .find(|battle| {
                battle.is_open()
                    && battle.side_a.player == creator
                    && battle.kind == BattleKind::Private { invited }
            })
            .map(|battle| battle.id)
    }

    /// The battle `monster` is fielded in, if that battle has not ended.
    ///
    /// A monster is engaged from the moment its roster is submitted until the
    /// battle ends, so it can fight in at most one battle at a time.
    pub fn engagement(&self, monster: MonsterId) -> Option<BattleId> {
        self.battles
            .values()
            .find(|battle| !battle.is_ended() && battle.fields(monster))
            .map(|battle| battle.id)
    }

    pub(crate) fn battle_mut(&mut self, id: BattleId) -> Option<&mut Battle> {
        self.battles.get_mut(&id)
    }

    pub(crate) fn allocate_id(&mut self) -> BattleId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Stores a battle, queueing it for matchmaking if it is an open public one.
    pub(crate) fn insert(&mut self, battle: Battle) {
        if battle.is_open() && battle.kind == BattleKind::Public {
            self.public_queue.push_back(battle.id);
        }
        self.battles.insert(battle.id, battle);
    }

    pub(crate) fn dequeue_public(&mut self, id: BattleId) {
        self.public_queue.retain(|queued| *queued != id);
    }
}
