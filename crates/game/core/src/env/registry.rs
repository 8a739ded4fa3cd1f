//! Monster registry interface.
//!
//! The registry owns monster records. The rules read them through
//! [`MonsterRegistry::monster`] and write back only the fields they are
//! responsible for. Implementations are assumed atomic per call.

use crate::state::{Cooldowns, MonsterId, MonsterInstance, PlayerId};

use super::error::RegistryError;

/// Read/write capability over monster records.
///
/// Writes through this trait are made on behalf of the rules
/// ([`PlayerId::SYSTEM`]); owner-initiated edits are the implementation's own
/// API and are authorized there.
pub trait MonsterRegistry {
    /// Returns a copy of the monster record.
    fn monster(&self, id: MonsterId) -> Result<MonsterInstance, RegistryError>;

    /// Returns the owner of the monster.
    fn owner_of(&self, id: MonsterId) -> Result<PlayerId, RegistryError> {
        self.monster(id).map(|monster| monster.owner)
    }

    fn set_health(&mut self, id: MonsterId, health: u32) -> Result<(), RegistryError>;

    fn set_cooldowns(&mut self, id: MonsterId, cooldowns: &Cooldowns) -> Result<(), RegistryError>;

    /// Stores level, experience and derived stats after a reward.
    fn store_progress(&mut self, monster: &MonsterInstance) -> Result<(), RegistryError>;
}
